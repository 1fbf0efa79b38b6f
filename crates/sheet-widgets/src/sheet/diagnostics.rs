#![forbid(unsafe_code)]

//! Lifecycle diagnostics emitted by the overlay host.
//!
//! Every step of show and dismissal is reported, in order, to an optional
//! listener. The stream is for tests and debugging tools; the host never
//! reads it back.

use std::time::Duration;

use sheet_core::StateIdentity;
use sheet_core::geometry::{Point, Size};

use super::animation::{AnimationTarget, TransitionDirection, TransitionOutcome};
use super::arbiter::DismissSource;
use super::snapshot::CaptureError;

/// One step in an overlay's life.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    WindowAttached,
    WindowConfigured {
        secure: bool,
        edge_to_edge: bool,
    },
    FirstLayout {
        size: Size,
    },
    EnterStarted {
        size: Size,
        pivot: Point,
    },
    /// A transition frame was applied.
    FrameCommitted {
        direction: TransitionDirection,
        target: AnimationTarget,
        presence: f32,
        /// Frame counter of the host's clock, starting at 1.
        frame: u64,
        /// Time since the previous frame the host saw.
        delta: Duration,
    },
    DismissForwarded {
        source: DismissSource,
    },
    DismissSuppressed {
        source: DismissSource,
    },
    SnapshotCaptured {
        size: Size,
    },
    SnapshotSkipped,
    SnapshotFailed {
        error: CaptureError,
    },
    /// Live content hidden and the snapshot proxy inserted, in one step.
    ProxyInserted,
    ContentTornDown {
        identity: StateIdentity,
    },
    ExitStarted {
        target: AnimationTarget,
        size: Size,
        pivot: Point,
    },
    TransitionEnded {
        outcome: TransitionOutcome,
    },
    SnapshotReleased {
        bytes: usize,
    },
    /// The parent lifecycle was destroyed; the overlay releases on the next
    /// frame.
    ParentDestroyed,
    WindowDetached,
}

/// Receives [`OverlayEvent`]s as they happen.
pub type OverlayListener = Box<dyn FnMut(&OverlayEvent)>;
