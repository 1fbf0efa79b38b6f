#![forbid(unsafe_code)]

//! Dismiss-intent arbitration.
//!
//! Outside taps, back signals, and Escape can all arrive within the same
//! frame. [`DismissArbiter`] collapses them so the owner's dismiss callback
//! runs once per dismissal.
//!
//! # Invariants
//!
//! 1. The first accepted signal sets the flag in the same call that
//!    accepts it. Input is handled serially on the UI thread, so no second
//!    signal can observe the flag unset in between.
//! 2. Only the exit transition's terminal path clears the flag
//!    ([`DismissArbiter::reset`] is crate-private).
//!
//! # Failure Modes
//!
//! - Duplicate signals are dropped silently; they are not errors.

use core::fmt;

/// Where a dismiss request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissSource {
    /// Press and release both landed outside the sheet.
    OutsideTap,
    /// System back gesture committed or back key pressed.
    BackSignal,
    /// Escape key pressed.
    EscapeKey,
    /// The owner asked the host to dismiss directly.
    Programmatic,
}

impl fmt::Display for DismissSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutsideTap => write!(f, "outside-tap"),
            Self::BackSignal => write!(f, "back-signal"),
            Self::EscapeKey => write!(f, "escape-key"),
            Self::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// The single "dismissal underway" cell of one overlay instance.
#[derive(Debug, Clone, Default)]
pub struct DismissArbiter {
    dismissing: bool,
    first_source: Option<DismissSource>,
    suppressed: u32,
}

impl DismissArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a dismissal is underway.
    #[inline]
    pub fn is_dismissing(&self) -> bool {
        self.dismissing
    }

    /// Accept `source` if no dismissal is underway, marking one as begun.
    ///
    /// Returns `true` exactly when the caller should forward the request.
    pub fn try_begin(&mut self, source: DismissSource) -> bool {
        if self.dismissing {
            self.suppressed = self.suppressed.saturating_add(1);
            return false;
        }
        self.dismissing = true;
        self.first_source = Some(source);
        true
    }

    /// Mark a dismissal as underway without forwarding anything.
    ///
    /// Used when the owner itself starts the exit.
    pub fn mark_dismissing(&mut self) {
        if !self.dismissing {
            self.dismissing = true;
            self.first_source = Some(DismissSource::Programmatic);
        }
    }

    /// The source that started the current dismissal.
    pub fn first_source(&self) -> Option<DismissSource> {
        self.first_source
    }

    /// Signals dropped since the current dismissal began.
    pub fn suppressed_count(&self) -> u32 {
        self.suppressed
    }

    /// Clear the flag. Only the exit transition's terminal path calls this.
    pub(crate) fn reset(&mut self) {
        self.dismissing = false;
        self.first_source = None;
        self.suppressed = 0;
    }
}
