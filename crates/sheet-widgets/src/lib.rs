#![forbid(unsafe_code)]

//! Modal bottom-sheet overlay for sheetkit.
//!
//! The [`sheet`] module holds the overlay host and the pieces it
//! orchestrates. Content shown inside a sheet implements [`SheetContent`].

pub mod sheet;

pub use sheet::{
    AnimationTarget, CaptureError, ContentContainer, ContentRegion, DismissArbiter, DismissSource,
    EventDisposition, INITIAL_SCALE, NativeWindow, OutsideTapTracker, OverlayError, OverlayEvent,
    OverlayHost, OverlayListener, OverlayPhase, SnapshotCapturer, SystemBarAppearance,
    TRANSITION_DURATION, TapClass, TransitionAnimator, TransitionDirection, TransitionEnd,
    TransitionFrame, TransitionOutcome, VisualSnapshot, WindowProvider,
};

use sheet_render::Surface;

/// Caller-supplied content rendered inside a sheet.
///
/// The host renders content into an offscreen surface sized to the
/// content's measured region, then composites that surface with the
/// current transition transform.
pub trait SheetContent {
    /// Paint into `surface`, which is exactly the content region's size.
    fn render(&self, surface: &mut Surface);

    /// Whether the content currently draws anything.
    ///
    /// An empty sheet has nothing worth capturing at dismissal.
    fn has_rendered_children(&self) -> bool {
        true
    }

    /// Release the content subtree and any state it scoped to the sheet.
    ///
    /// Called exactly once, before the exit transition's first frame.
    fn dispose(&mut self) {}
}
