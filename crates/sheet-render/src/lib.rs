#![forbid(unsafe_code)]

//! Render kernel: colours, RGBA surfaces, colour-only rasters, and layer
//! transforms.
//!
//! A [`Surface`](surface::Surface) is what live content draws into; it
//! carries per-pixel alpha. A [`Raster`](raster::Raster) is a frozen,
//! colour-only copy of a surface whose transparency has already been
//! composited against a background. Both implement
//! [`PixelSource`](surface::PixelSource) so they can be drawn with the same
//! [`LayerTransform`](layer::LayerTransform).

pub mod color;
pub mod layer;
pub mod raster;
pub mod surface;

pub use color::PackedRgba;
pub use layer::LayerTransform;
pub use raster::{Raster, RasterError, Rgb};
pub use surface::{PixelSource, Surface};
