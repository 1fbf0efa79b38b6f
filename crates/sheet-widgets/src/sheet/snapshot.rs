#![forbid(unsafe_code)]

//! Visual snapshot capture.
//!
//! Before a sheet's content is torn down, its current appearance is frozen
//! into a colour-only [`Raster`]. The exit transition then animates that
//! raster instead of the live content, so teardown can happen immediately.
//!
//! # Invariants
//!
//! - A snapshot's width and height are the region's size at the moment of
//!   capture. They are stored, never re-measured.
//! - Pixels carry no alpha: content transparency is composited onto the
//!   capture background first, and fading happens at the layer level.
//!
//! # Failure Modes
//!
//! | Condition | Result |
//! |-----------|--------|
//! | Zero width or height | `Ok(None)` |
//! | No content, or content with nothing rendered | `Ok(None)` |
//! | Capture disabled | `Ok(None)` |
//! | Area above the configured ceiling | `Err(ExceedsCeiling)` |
//! | Raster allocation failure | `Err(AllocationFailed)` |

use core::fmt;

use sheet_core::geometry::Size;
use sheet_render::{PackedRgba, Raster, RasterError, Surface};
use sheet_runtime::SheetConfig;

use crate::SheetContent;

/// Why a capture could not produce a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    /// The region has more pixels than the configured ceiling.
    ExceedsCeiling { width: u32, height: u32, limit: u64 },
    /// The pixel buffer could not be allocated.
    AllocationFailed { bytes: u64 },
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExceedsCeiling {
                width,
                height,
                limit,
            } => write!(
                f,
                "capture of {width}x{height} exceeds the {limit}-pixel ceiling"
            ),
            Self::AllocationFailed { bytes } => {
                write!(f, "failed to allocate {bytes} bytes for snapshot")
            }
        }
    }
}

impl std::error::Error for CaptureError {}

impl From<RasterError> for CaptureError {
    fn from(err: RasterError) -> Self {
        match err {
            RasterError::Allocation { bytes } => Self::AllocationFailed { bytes },
        }
    }
}

/// The region to capture: its measured size and what is drawn in it.
#[derive(Clone, Copy)]
pub struct ContentRegion<'a> {
    pub size: Size,
    pub content: Option<&'a dyn SheetContent>,
}

impl fmt::Debug for ContentRegion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentRegion")
            .field("size", &self.size)
            .field("has_content", &self.content.is_some())
            .finish()
    }
}

impl<'a> ContentRegion<'a> {
    pub fn new(size: Size, content: Option<&'a dyn SheetContent>) -> Self {
        Self { size, content }
    }

    /// Whether there is anything worth capturing.
    pub fn is_capturable(&self) -> bool {
        !self.size.is_empty()
            && self
                .content
                .is_some_and(|content| content.has_rendered_children())
    }
}

/// A frozen, colour-only image of a sheet's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualSnapshot {
    raster: Raster,
    size: Size,
}

impl VisualSnapshot {
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Size recorded at capture time.
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Bytes held by the pixel buffer.
    pub fn byte_len(&self) -> usize {
        self.raster.byte_len()
    }
}

/// Rasterises sheet content into [`VisualSnapshot`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotCapturer {
    max_pixels: u64,
    background: PackedRgba,
    enabled: bool,
}

impl Default for SnapshotCapturer {
    fn default() -> Self {
        Self::from_config(&SheetConfig::default())
    }
}

impl SnapshotCapturer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capturer using the ceiling, background, and enable flag of `config`.
    pub fn from_config(config: &SheetConfig) -> Self {
        Self {
            max_pixels: config.max_capture_pixels,
            background: config.capture_background,
            enabled: config.snapshot_enabled,
        }
    }

    #[must_use]
    pub fn max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    #[must_use]
    pub fn background(mut self, background: PackedRgba) -> Self {
        self.background = background;
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Freeze the region's current appearance.
    pub fn capture(
        &self,
        region: &ContentRegion<'_>,
    ) -> Result<Option<VisualSnapshot>, CaptureError> {
        if !self.enabled || !region.is_capturable() {
            return Ok(None);
        }
        let Some(content) = region.content else {
            return Ok(None);
        };
        let size = region.size;
        if size.area() > self.max_pixels {
            return Err(CaptureError::ExceedsCeiling {
                width: size.width,
                height: size.height,
                limit: self.max_pixels,
            });
        }

        #[cfg(feature = "hot-path-spans")]
        let _span = tracing::debug_span!("snapshot_capture", w = size.width, h = size.height)
            .entered();

        let mut surface = Surface::new(size.width, size.height);
        content.render(&mut surface);
        let raster = Raster::flatten(&surface, self.background)?;
        Ok(Some(VisualSnapshot { raster, size }))
    }
}
