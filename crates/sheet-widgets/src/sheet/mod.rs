#![forbid(unsafe_code)]

//! Bottom-sheet overlay: host, transitions, snapshot capture, and dismiss
//! arbitration.
//!
//! # Dismissal
//!
//! Three timelines have to stay in step when a sheet goes away: the
//! content's state teardown, the 150ms exit transition, and the navigation
//! system, which may create a new sheet with the same content while the old
//! one is still animating out. The host resolves this by freezing the
//! content into a [`VisualSnapshot`], tearing the content down at once, and
//! animating the snapshot instead:
//!
//! 1. [`DismissArbiter`] lets one dismiss signal through.
//! 2. [`SnapshotCapturer`] freezes the content region.
//! 3. The live content is hidden and the proxy inserted in the same step.
//! 4. Content is disposed and its saved-state identity unregistered.
//! 5. [`TransitionAnimator`] plays the exit against the proxy (or the empty
//!    live container when nothing was captured).
//! 6. The exit's terminal outcome drops the snapshot, detaches the window,
//!    and re-arms the arbiter.
//!
//! # Example
//!
//! ```ignore
//! let mut host = OverlayHost::new(&mut provider, &context, props, on_dismiss, |ctx| {
//!     Box::new(ProfileSheet::new(ctx))
//! })?;
//! host.show()?;
//! host.on_layout(measured);
//! while host.wants_frame() {
//!     host.on_frame(Instant::now());
//!     host.render(&mut surface);
//! }
//! ```

mod animation;
mod arbiter;
mod container;
mod diagnostics;
mod error;
mod host;
mod snapshot;
mod window;

pub use animation::{
    AnimationTarget, INITIAL_SCALE, TRANSITION_DURATION, TransitionAnimator, TransitionDirection,
    TransitionEnd, TransitionFrame, TransitionOutcome,
};
pub use arbiter::{DismissArbiter, DismissSource};
pub use container::{ContentContainer, OutsideTapTracker, TapClass};
pub use diagnostics::{OverlayEvent, OverlayListener};
pub use error::OverlayError;
pub use host::{EventDisposition, OverlayHost, OverlayPhase};
pub use snapshot::{CaptureError, ContentRegion, SnapshotCapturer, VisualSnapshot};
pub use window::{NativeWindow, SystemBarAppearance, WindowProvider};
