#![forbid(unsafe_code)]

//! Core types for sheetkit: geometry, input events, layout direction,
//! process-unique state identities, and the overlay data model.
//!
//! Everything in this crate is a plain value type. Nothing here owns a
//! window, a clock, or a composition; those live in `sheet-runtime` and
//! `sheet-widgets`.

pub mod direction;
pub mod event;
pub mod geometry;
pub mod identity;
#[cfg(feature = "tracing-json")]
pub mod logging;
pub mod overlay;

pub use direction::LayoutDirection;
pub use identity::StateIdentity;
pub use overlay::{OverlayProperties, SecurePolicy};

/// Monotonic timestamp used by frame callbacks.
///
/// Re-exported from `web-time` so the same type works on native and wasm.
pub use web_time::Instant;
