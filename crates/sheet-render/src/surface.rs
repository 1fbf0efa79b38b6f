#![forbid(unsafe_code)]

//! RGBA drawing surface.
//!
//! # Invariants
//!
//! - `pixels().len() == width * height` at all times.
//! - Out-of-bounds reads return `None`; out-of-bounds writes are ignored.
//!
//! # Failure Modes
//!
//! - Drawing a layer whose transform is invisible is a no-op.
//! - Layers are clipped to the surface; partially visible layers draw only
//!   their visible part.

use sheet_core::geometry::{Point, Rect, Size};

use crate::color::PackedRgba;
use crate::layer::LayerTransform;

/// Anything that can be sampled pixel by pixel.
pub trait PixelSource {
    /// Pixel dimensions.
    fn size(&self) -> Size;

    /// Colour at `(x, y)`; callers stay within `size()`.
    fn pixel(&self, x: u32, y: u32) -> PackedRgba;
}

/// A width × height grid of RGBA pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    size: Size,
    pixels: Vec<PackedRgba>,
}

impl Surface {
    /// Create a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        let size = Size::new(width, height);
        Self {
            size,
            pixels: vec![PackedRgba::TRANSPARENT; size.area() as usize],
        }
    }

    /// Surface width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Surface height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Bounds at the origin.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }

    /// Raw pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[PackedRgba] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.size.width && y < self.size.height)
            .then(|| y as usize * self.size.width as usize + x as usize)
    }

    /// Read a pixel.
    pub fn get(&self, x: u32, y: u32) -> Option<PackedRgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Overwrite a pixel.
    pub fn set(&mut self, x: u32, y: u32, color: PackedRgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Overwrite every pixel in `area` (clipped to the surface).
    pub fn fill(&mut self, area: Rect, color: PackedRgba) {
        let area = area.intersection(self.bounds());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.set(x, y, color);
            }
        }
    }

    /// Composite `color` over every pixel in `area` (clipped to the surface).
    pub fn blend_fill(&mut self, area: Rect, color: PackedRgba) {
        if color.a() == 0 {
            return;
        }
        let area = area.intersection(self.bounds());
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                if let Some(i) = self.index(x, y) {
                    self.pixels[i] = color.over(self.pixels[i]);
                }
            }
        }
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(PackedRgba::TRANSPARENT);
    }

    /// Draw `source` as a layer whose untransformed top-left sits at
    /// `origin`, applying `transform` (scale about its pivot, then opacity).
    ///
    /// Sampling is nearest-neighbour at destination pixel centres.
    pub fn draw_layer(
        &mut self,
        source: &dyn PixelSource,
        origin: Point,
        transform: LayerTransform,
    ) {
        let src = source.size();
        if src.is_empty() || transform.is_invisible() {
            return;
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!(
            "draw_layer",
            w = src.width,
            h = src.height,
            alpha = transform.alpha
        )
        .entered();

        // Transformed bounds, in surface space.
        let a = transform.apply(Point::ORIGIN);
        let b = transform.apply(Point::new(src.width as f32, src.height as f32));
        let min_x = (origin.x + a.x.min(b.x)).floor().max(0.0);
        let min_y = (origin.y + a.y.min(b.y)).floor().max(0.0);
        let max_x = (origin.x + a.x.max(b.x)).ceil().min(self.size.width as f32);
        let max_y = (origin.y + a.y.max(b.y)).ceil().min(self.size.height as f32);
        if max_x <= min_x || max_y <= min_y {
            return;
        }

        for y in min_y as u32..max_y as u32 {
            for x in min_x as u32..max_x as u32 {
                let center = Point::new(x as f32 + 0.5 - origin.x, y as f32 + 0.5 - origin.y);
                let Some(local) = transform.invert(center) else {
                    return;
                };
                if local.x < 0.0 || local.y < 0.0 {
                    continue;
                }
                let (sx, sy) = (local.x as u32, local.y as u32);
                if sx >= src.width || sy >= src.height {
                    continue;
                }
                let color = source.pixel(sx, sy);
                let color = color.with_opacity(transform.alpha);
                if let Some(i) = self.index(x, y) {
                    self.pixels[i] = color.over(self.pixels[i]);
                }
            }
        }
    }
}

impl PixelSource for Surface {
    fn size(&self) -> Size {
        self.size
    }

    fn pixel(&self, x: u32, y: u32) -> PackedRgba {
        self.get(x, y).unwrap_or(PackedRgba::TRANSPARENT)
    }
}
