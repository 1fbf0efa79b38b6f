#![forbid(unsafe_code)]

//! Enter and exit transitions for a sheet.
//!
//! Four properties move in lockstep over [`TRANSITION_DURATION`]:
//! scrim colour (transparent to the configured scrim, per channel), the
//! target's horizontal and vertical scale ([`INITIAL_SCALE`] to 1.0), and
//! the target's opacity (0 to 1). Scaling pivots at the bottom-centre of
//! the target, computed from the size passed in when the transition
//! starts.
//!
//! # Invariants
//!
//! - Presence is always in `[0.0, 1.0]`.
//! - Scale is always in `[INITIAL_SCALE, 1.0]`.
//! - Every started transition ends exactly once, as either
//!   [`TransitionEnd::Completed`] or [`TransitionEnd::Cancelled`], and that
//!   end is reported through the same return channel either way.
//! - Starting a transition while another is in flight cancels the old one
//!   first and reports its outcome.
//!
//! # Failure Modes
//!
//! - Frame timestamps earlier than the start are treated as the start.
//! - Ticking with nothing in flight is a no-op.

use std::time::Duration;

use sheet_core::Instant;
use sheet_core::geometry::{Point, Size};
use sheet_render::{LayerTransform, PackedRgba};

/// Length of every sheet transition.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(150);

/// Scale of the target when fully hidden.
pub const INITIAL_SCALE: f32 = 0.8;

/// Cubic ease-in-out, the one curve used for both directions.
fn ease(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv * inv / 2.0
    }
}

/// Which way a transition runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionDirection {
    Enter,
    Exit,
}

/// What the transition is currently moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationTarget {
    /// The live content container.
    Content,
    /// The frozen snapshot standing in for torn-down content.
    SnapshotProxy,
}

/// How a transition finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionEnd {
    Completed,
    Cancelled,
}

/// Terminal report for one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub direction: TransitionDirection,
    pub target: AnimationTarget,
    pub end: TransitionEnd,
}

/// Values to draw for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionFrame {
    /// How shown the sheet is, `0.0` hidden to `1.0` fully open.
    pub presence: f32,
    /// Scrim colour covering the whole window.
    pub scrim: PackedRgba,
    /// Opacity and scale for the target layer.
    pub transform: LayerTransform,
}

#[derive(Debug, Clone, Copy)]
struct ActiveTransition {
    direction: TransitionDirection,
    /// Set by the first tick, so frame zero always shows the start values.
    started: Option<Instant>,
}

/// Drives one sheet's transitions.
#[derive(Debug, Clone)]
pub struct TransitionAnimator {
    scrim: PackedRgba,
    presence: f32,
    target: AnimationTarget,
    target_size: Size,
    active: Option<ActiveTransition>,
}

impl TransitionAnimator {
    /// Animator resting in the hidden state.
    pub fn new(scrim: PackedRgba) -> Self {
        Self {
            scrim,
            presence: 0.0,
            target: AnimationTarget::Content,
            target_size: Size::ZERO,
            active: None,
        }
    }

    /// Start the enter transition against `target` of the given size.
    ///
    /// Returns the outcome of a cancelled in-flight transition, if any.
    pub fn play_enter(&mut self, target: AnimationTarget, size: Size) -> Option<TransitionOutcome> {
        let cancelled = self.cancel();
        self.start(TransitionDirection::Enter, target, size, 0.0);
        cancelled
    }

    /// Start the exit transition against `target` of the given size.
    ///
    /// The exit always runs its full length from the fully-open values.
    pub fn play_exit(&mut self, target: AnimationTarget, size: Size) -> Option<TransitionOutcome> {
        let cancelled = self.cancel();
        self.start(TransitionDirection::Exit, target, size, 1.0);
        cancelled
    }

    fn start(
        &mut self,
        direction: TransitionDirection,
        target: AnimationTarget,
        size: Size,
        presence: f32,
    ) {
        self.target = target;
        self.target_size = size;
        self.presence = presence;
        self.active = Some(ActiveTransition {
            direction,
            started: None,
        });
    }

    /// Advance to `now`. Returns the outcome when the transition completes.
    pub fn tick(&mut self, now: Instant) -> Option<TransitionOutcome> {
        let active = self.active.as_mut()?;
        let started = *active.started.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started);
        let t = (elapsed.as_secs_f32() / TRANSITION_DURATION.as_secs_f32()).min(1.0);
        let direction = active.direction;

        self.presence = match direction {
            TransitionDirection::Enter => ease(t),
            TransitionDirection::Exit => 1.0 - ease(t),
        };

        if t < 1.0 {
            return None;
        }
        self.active = None;
        Some(TransitionOutcome {
            direction,
            target: self.target,
            end: TransitionEnd::Completed,
        })
    }

    /// Stop the in-flight transition, holding its current values.
    pub fn cancel(&mut self) -> Option<TransitionOutcome> {
        let active = self.active.take()?;
        Some(TransitionOutcome {
            direction: active.direction,
            target: self.target,
            end: TransitionEnd::Cancelled,
        })
    }

    /// Update the target size while the live content is being animated.
    ///
    /// Has no effect on a snapshot proxy, whose size was fixed at capture.
    pub fn resize_content(&mut self, size: Size) {
        if self.target == AnimationTarget::Content {
            self.target_size = size;
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Direction of the in-flight transition.
    pub fn direction(&self) -> Option<TransitionDirection> {
        self.active.map(|active| active.direction)
    }

    pub fn target(&self) -> AnimationTarget {
        self.target
    }

    /// Scale pivot in target-local pixels.
    pub fn pivot(&self) -> Point {
        Point::bottom_center_of(self.target_size)
    }

    pub fn presence(&self) -> f32 {
        self.presence
    }

    /// Values to draw now.
    pub fn frame(&self) -> TransitionFrame {
        let p = self.presence.clamp(0.0, 1.0);
        let scale = INITIAL_SCALE + (1.0 - INITIAL_SCALE) * p;
        TransitionFrame {
            presence: p,
            scrim: PackedRgba::TRANSPARENT.lerp(self.scrim, p),
            transform: LayerTransform {
                alpha: p,
                scale_x: scale,
                scale_y: scale,
                pivot: self.pivot(),
            },
        }
    }
}
