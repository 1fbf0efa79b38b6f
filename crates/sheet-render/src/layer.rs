#![forbid(unsafe_code)]

//! Per-layer visual transform: opacity plus scale about a pivot.
//!
//! The pivot is expressed in the layer's own coordinate space (origin at the
//! layer's top-left corner) and is supplied by the caller. A transform never
//! asks the layer for its size.

use sheet_core::geometry::Point;

/// Opacity and scale applied to a layer when it is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerTransform {
    /// Layer opacity in `[0.0, 1.0]`.
    pub alpha: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Fixed point of the scale, in layer-local pixels.
    pub pivot: Point,
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl LayerTransform {
    /// Fully opaque, unscaled.
    pub const IDENTITY: Self = Self {
        alpha: 1.0,
        scale_x: 1.0,
        scale_y: 1.0,
        pivot: Point::ORIGIN,
    };

    /// Map a layer-local point to its transformed position.
    pub fn apply(&self, local: Point) -> Point {
        Point::new(
            self.pivot.x + (local.x - self.pivot.x) * self.scale_x,
            self.pivot.y + (local.y - self.pivot.y) * self.scale_y,
        )
    }

    /// Map a transformed point back to layer-local space.
    ///
    /// Returns `None` when either scale is zero (nothing is visible).
    pub fn invert(&self, transformed: Point) -> Option<Point> {
        if self.scale_x == 0.0 || self.scale_y == 0.0 {
            return None;
        }
        Some(Point::new(
            self.pivot.x + (transformed.x - self.pivot.x) / self.scale_x,
            self.pivot.y + (transformed.y - self.pivot.y) / self.scale_y,
        ))
    }

    /// Whether drawing with this transform would produce no pixels.
    pub fn is_invisible(&self) -> bool {
        self.alpha <= 0.0 || self.scale_x == 0.0 || self.scale_y == 0.0
    }
}
