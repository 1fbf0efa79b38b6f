#![forbid(unsafe_code)]

//! Packed RGBA colour.
//!
//! Colours are stored non-premultiplied as `0xRRGGBBAA`.
//!
//! # Invariants
//!
//! - `lerp(a, b, 0.0) == a` and `lerp(a, b, 1.0) == b`.
//! - Every channel of `lerp(a, b, t)` lies between the same channel of `a`
//!   and `b`.
//! - `over` with an opaque destination always yields an opaque colour.

/// A non-premultiplied RGBA colour packed into a `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque colour from channels.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Colour from channels including alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32)
    }

    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// Whether alpha is 255.
    #[inline]
    pub const fn is_opaque(self) -> bool {
        self.a() == 255
    }

    /// Same colour with the given alpha.
    #[inline]
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self((self.0 & 0xFFFF_FF00) | a as u32)
    }

    /// Scale alpha by `opacity` in `[0.0, 1.0]`.
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = if opacity.is_nan() {
            0.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
        let a = (self.a() as f32 * opacity).round() as u8;
        self.with_alpha(a)
    }

    /// Linear per-channel interpolation (alpha included).
    ///
    /// `t` is clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mix = |from: u8, to: u8| -> u8 {
            let from = from as f32;
            let to = to as f32;
            (from + (to - from) * t).round().clamp(0.0, 255.0) as u8
        };
        Self::rgba(
            mix(self.r(), other.r()),
            mix(self.g(), other.g()),
            mix(self.b(), other.b()),
            mix(self.a(), other.a()),
        )
    }

    /// Source-over composite of `self` on top of `dst`.
    #[must_use]
    pub fn over(self, dst: Self) -> Self {
        let sa = self.a() as f32 / 255.0;
        if sa >= 1.0 {
            return self;
        }
        let da = dst.a() as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return Self::TRANSPARENT;
        }
        let channel = |s: u8, d: u8| -> u8 {
            let value = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
            value.round().clamp(0.0, 255.0) as u8
        };
        Self::rgba(
            channel(self.r(), dst.r()),
            channel(self.g(), dst.g()),
            channel(self.b(), dst.b()),
            (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        )
    }

    /// Relative luminance in `[0.0, 1.0]` (Rec. 709 weights, sRGB ignored).
    pub fn luminance(self) -> f32 {
        (0.2126 * self.r() as f32 + 0.7152 * self.g() as f32 + 0.0722 * self.b() as f32) / 255.0
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => u32::from_str_radix(digits, 16).ok().map(|v| Self((v << 8) | 0xFF)),
            8 => u32::from_str_radix(digits, 16).ok().map(Self),
            _ => None,
        }
    }

    /// Format as `#RRGGBBAA`.
    pub fn to_hex(self) -> String {
        format!("#{:08X}", self.0)
    }
}
