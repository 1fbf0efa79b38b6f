#![forbid(unsafe_code)]

//! Pixel geometry primitives.
//!
//! Layout works in whole device pixels (`Rect`, `Size`). Pointer input and
//! animation pivots work in fractional pixels (`Point`).

/// A size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Create a new size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered by this size.
    #[inline]
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// A point in fractional device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Bottom-centre of a box of the given size, relative to its top-left.
    ///
    /// This is the scale pivot for every sheet transition. It is computed
    /// from dimensions the caller already holds, never from a view query.
    #[inline]
    pub fn bottom_center_of(size: Size) -> Self {
        Self::new(size.width as f32 / 2.0, size.height as f32)
    }
}

/// An axis-aligned rectangle in device pixels.
///
/// Invariants:
/// - `right()` and `bottom()` saturate instead of overflowing.
/// - An empty rect contains no point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Size of this rectangle.
    #[inline]
    pub const fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when either dimension is zero.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Exclusive right edge.
    #[inline]
    pub const fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    #[inline]
    pub const fn bottom(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Whether the fractional point lies inside this rectangle.
    ///
    /// The left/top edges are inclusive, right/bottom exclusive.
    pub fn contains(self, point: Point) -> bool {
        if self.is_empty() || !point.x.is_finite() || !point.y.is_finite() {
            return false;
        }
        point.x >= self.x as f32
            && point.y >= self.y as f32
            && point.x < self.right() as f32
            && point.y < self.bottom() as f32
    }

    /// Intersection of two rectangles, or an empty rect at `self`'s origin.
    pub fn intersection(self, other: Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Rect::new(self.x, self.y, 0, 0);
        }
        Rect::new(x, y, right - x, bottom - y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_center_pivot() {
        let pivot = Point::bottom_center_of(Size::new(300, 200));
        assert_eq!(pivot, Point::new(150.0, 200.0));
    }

    #[test]
    fn contains_edges() {
        let rect = Rect::new(10, 10, 5, 5);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(14.9, 14.9)));
        assert!(!rect.contains(Point::new(15.0, 12.0)));
        assert!(!rect.contains(Point::new(9.9, 12.0)));
    }

    #[test]
    fn empty_rect_contains_nothing() {
        let rect = Rect::new(0, 0, 0, 10);
        assert!(!rect.contains(Point::ORIGIN));
    }

    #[test]
    fn nan_point_is_outside() {
        let rect = Rect::new(0, 0, 10, 10);
        assert!(!rect.contains(Point::new(f32::NAN, 1.0)));
    }

    #[test]
    fn right_bottom_saturate() {
        let rect = Rect::new(u32::MAX - 1, u32::MAX - 1, 10, 10);
        assert_eq!(rect.right(), u32::MAX);
        assert_eq!(rect.bottom(), u32::MAX);
    }

    #[test]
    fn intersection_overlapping_and_disjoint() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersection(b), Rect::new(5, 5, 5, 5));
        let c = Rect::new(20, 20, 2, 2);
        assert!(a.intersection(c).is_empty());
    }

    #[test]
    fn size_area_and_empty() {
        assert_eq!(Size::new(300, 200).area(), 60_000);
        assert!(Size::new(0, 5).is_empty());
        assert!(!Size::new(1, 1).is_empty());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn rect() -> impl Strategy<Value = Rect> {
            (0u32..500, 0u32..500, 0u32..300, 0u32..300)
                .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
        }

        proptest! {
            #[test]
            fn intersection_lies_inside_both(
                a in rect(),
                b in rect(),
                px in 0.0f32..900.0,
                py in 0.0f32..900.0,
            ) {
                let i = a.intersection(b);
                let p = Point::new(px, py);
                prop_assert_eq!(i.contains(p), a.contains(p) && b.contains(p));
            }

            #[test]
            fn intersection_is_symmetric_in_area(a in rect(), b in rect()) {
                prop_assert_eq!(a.intersection(b).size().area(), b.intersection(a).size().area());
            }

            #[test]
            fn bottom_center_sits_on_bottom_edge(w in 0u32..4096, h in 0u32..4096) {
                let pivot = Point::bottom_center_of(Size::new(w, h));
                prop_assert_eq!(pivot.y, h as f32);
                prop_assert!((pivot.x * 2.0 - w as f32).abs() < 1e-3);
            }
        }
    }
}
