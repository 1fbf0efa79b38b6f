#![forbid(unsafe_code)]

//! Runtime services for sheetkit overlays.
//!
//! - [`ContentContext`]: the explicit ambient context handed to overlay
//!   content (lifecycle, scoped state, saved-state registry, identity).
//! - [`Lifecycle`], [`StateScope`], [`SavedStateRegistry`]: the pieces that
//!   context is built from.
//! - [`FrameClock`]: animation-frame scheduling bookkeeping.
//! - [`SheetConfig`]: configuration, optionally loaded from TOML.
//!
//! # Architecture
//!
//! All handles use `Rc<RefCell<..>>` for single-threaded shared ownership:
//! overlay lifecycle work happens on the UI thread only. Cloning a handle
//! shares the underlying state.

pub mod config;
pub mod context;
pub mod frame_clock;
pub mod lifecycle;
pub mod scope;

pub use config::{ConfigError, SheetConfig};
pub use context::ContentContext;
pub use frame_clock::{FrameClock, FrameInfo};
pub use lifecycle::{Lifecycle, LifecycleObservation, LifecycleState};
pub use scope::{SavedBundle, SavedStateRegistry, ScopeError, ScopedState, StateScope};
