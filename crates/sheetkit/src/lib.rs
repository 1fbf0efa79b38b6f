#![forbid(unsafe_code)]

//! sheetkit: modal bottom-sheet overlays.
//!
//! This crate re-exports the workspace crates under short names and offers
//! a [`prelude`] with the types most callers need:
//!
//! - [`core`]: geometry, events, identities, overlay properties
//! - [`render`]: colours, surfaces, rasters
//! - [`runtime`]: content context, lifecycle, configuration
//! - [`widgets`]: the overlay host and its parts
//! - [`nav`]: scene selection from a back stack (feature `nav`)

pub use sheet_core as core;
#[cfg(feature = "nav")]
pub use sheet_nav as nav;
pub use sheet_render as render;
pub use sheet_runtime as runtime;
pub use sheet_widgets as widgets;

pub mod prelude {
    //! Common imports for presenting a sheet.

    pub use sheet_core::event::{BackEvent, Event, KeyCode, KeyEvent, PointerEvent};
    pub use sheet_core::geometry::{Point, Rect, Size};
    pub use sheet_core::{Instant, LayoutDirection, OverlayProperties, SecurePolicy, StateIdentity};
    pub use sheet_render::{PackedRgba, Surface};
    pub use sheet_runtime::{ContentContext, Lifecycle, LifecycleState, SheetConfig};
    pub use sheet_widgets::{
        DismissSource, EventDisposition, NativeWindow, OverlayError, OverlayEvent, OverlayHost,
        OverlayPhase, SheetContent, WindowProvider,
    };

    #[cfg(feature = "nav")]
    pub use sheet_nav::{NavEntry, Scene, SceneCache, SceneChain, SceneStrategy};
}
