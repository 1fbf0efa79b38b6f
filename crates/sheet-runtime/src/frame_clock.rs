#![forbid(unsafe_code)]

//! Animation-frame request bookkeeping.
//!
//! The embedding event loop owns the real vsync source. [`FrameClock`]
//! only tracks whether a frame has been asked for and computes the delta
//! between consecutive frames.

use std::time::Duration;

use sheet_core::Instant;

/// Per-frame timing handed to animators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// Monotonic frame counter, starting at 1.
    pub frame: u64,
    /// Frame timestamp.
    pub now: Instant,
    /// Time since the previous frame; zero for the first one.
    pub delta: Duration,
}

/// Tracks frame requests and frame-to-frame deltas.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    requested: bool,
    frame: u64,
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for another frame.
    pub fn request(&mut self) {
        self.requested = true;
    }

    /// Whether a frame is pending.
    pub fn is_requested(&self) -> bool {
        self.requested
    }

    /// Withdraw a pending request.
    pub fn cancel_request(&mut self) {
        self.requested = false;
    }

    /// Mark the start of a frame at `now`.
    ///
    /// Clears the pending request; animators re-request if they need more.
    /// Timestamps that go backwards yield a zero delta.
    pub fn begin_frame(&mut self, now: Instant) -> FrameInfo {
        self.requested = false;
        self.frame += 1;
        let delta = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last = Some(now);
        FrameInfo {
            frame: self.frame,
            now,
            delta,
        }
    }

    /// Forget the previous timestamp so the next delta starts from zero.
    pub fn reset_timing(&mut self) {
        self.last = None;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}
