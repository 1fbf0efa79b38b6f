#![forbid(unsafe_code)]

//! Colour-only raster.
//!
//! A [`Raster`] stores three bytes per pixel and has no alpha channel. Any
//! transparency in the source surface is resolved at flatten time by
//! compositing against a caller-chosen background, so sampling a raster
//! always yields opaque colours. Opacity is a property of the layer that
//! draws the raster, never of its pixels.
//!
//! # Failure Modes
//!
//! - Pixel storage is reserved fallibly; if the allocator refuses,
//!   [`Raster::flatten`] returns [`RasterError::Allocation`] instead of
//!   aborting.

use core::fmt;

use sheet_core::geometry::Size;

use crate::color::PackedRgba;
use crate::surface::{PixelSource, Surface};

/// One opaque pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// Drop alpha from an already-opaque colour.
    #[inline]
    pub const fn from_opaque(color: PackedRgba) -> Self {
        Self([color.r(), color.g(), color.b()])
    }

    /// Expand to an opaque packed colour.
    #[inline]
    pub const fn to_packed(self) -> PackedRgba {
        PackedRgba::rgb(self.0[0], self.0[1], self.0[2])
    }
}

/// Raster construction failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// Pixel storage could not be reserved.
    Allocation { bytes: u64 },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocation { bytes } => write!(f, "failed to allocate {bytes} raster bytes"),
        }
    }
}

impl std::error::Error for RasterError {}

/// An immutable, colour-only pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    size: Size,
    pixels: Vec<Rgb>,
}

impl Raster {
    /// Bytes needed for a raster of `size`.
    #[inline]
    pub const fn bytes_for(size: Size) -> u64 {
        size.area() * 3
    }

    /// Composite `surface` over an opaque `background` and drop alpha.
    ///
    /// A translucent background is treated as opaque.
    pub fn flatten(surface: &Surface, background: PackedRgba) -> Result<Self, RasterError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "raster_flatten",
            w = surface.width(),
            h = surface.height()
        )
        .entered();

        let size = PixelSource::size(surface);
        let background = background.with_alpha(255);
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(surface.pixels().len())
            .map_err(|_| RasterError::Allocation {
                bytes: Self::bytes_for(size),
            })?;
        pixels.extend(
            surface
                .pixels()
                .iter()
                .map(|p| Rgb::from_opaque(p.over(background))),
        );
        Ok(Self { size, pixels })
    }

    /// Raster width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Raster height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Heap bytes held by the pixel buffer.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.pixels.len() * 3
    }

    /// Pixel rows in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }
}

impl PixelSource for Raster {
    fn size(&self) -> Size {
        self.size
    }

    fn pixel(&self, x: u32, y: u32) -> PackedRgba {
        if x >= self.size.width || y >= self.size.height {
            return PackedRgba::TRANSPARENT;
        }
        self.pixels[y as usize * self.size.width as usize + x as usize].to_packed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheet_core::geometry::Rect;

    #[test]
    fn flatten_composites_against_background() {
        let mut surface = Surface::new(2, 1);
        surface.set(0, 0, PackedRgba::rgba(0, 0, 0, 128));
        let raster = Raster::flatten(&surface, PackedRgba::WHITE).unwrap();
        assert_eq!(raster.pixel(0, 0), PackedRgba::rgb(127, 127, 127));
        // Fully transparent pixels take the background colour.
        assert_eq!(raster.pixel(1, 0), PackedRgba::WHITE);
    }

    #[test]
    fn flatten_is_always_opaque() {
        let mut surface = Surface::new(3, 3);
        surface.fill(Rect::new(0, 0, 2, 2), PackedRgba::rgba(200, 10, 10, 7));
        let raster = Raster::flatten(&surface, PackedRgba::rgba(0, 0, 0, 0)).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                assert!(raster.pixel(x, y).is_opaque());
            }
        }
    }

    #[test]
    fn dimensions_and_bytes() {
        let surface = Surface::new(30, 20);
        let raster = Raster::flatten(&surface, PackedRgba::WHITE).unwrap();
        assert_eq!((raster.width(), raster.height()), (30, 20));
        assert_eq!(raster.byte_len(), 30 * 20 * 3);
        assert_eq!(Raster::bytes_for(Size::new(30, 20)), 1800);
    }

    #[test]
    fn out_of_bounds_sample_is_transparent() {
        let raster = Raster::flatten(&Surface::new(1, 1), PackedRgba::WHITE).unwrap();
        assert_eq!(raster.pixel(1, 0), PackedRgba::TRANSPARENT);
    }
}
