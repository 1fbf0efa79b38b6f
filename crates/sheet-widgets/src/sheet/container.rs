#![forbid(unsafe_code)]

//! Bottom-anchored content container and outside-tap classification.
//!
//! The container sits inside a window that covers the whole screen. Its
//! bounds are recomputed from the screen and the content's measured size
//! on every layout pass.
//!
//! # Invariants
//!
//! - Bounds are horizontally centred, flush with the screen's bottom edge,
//!   and clamped inside the screen.
//! - The measured size is kept as reported, independently of clamping.
//! - A hidden container keeps its bounds; only painting stops.

use sheet_core::event::{PointerEvent, PointerEventKind};
use sheet_core::geometry::{Rect, Size};

/// Where a sheet's content sits inside the overlay window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentContainer {
    measured: Size,
    bounds: Rect,
    visible: bool,
}

impl ContentContainer {
    /// An empty, visible container.
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Self::default()
        }
    }

    /// Bottom-centre placement of `size` within `screen`.
    pub fn anchor(screen: Rect, size: Size) -> Rect {
        let width = size.width.min(screen.width);
        let height = size.height.min(screen.height);
        let x = screen.x + (screen.width - width) / 2;
        let y = screen.bottom() - height;
        Rect::new(x, y, width, height)
    }

    /// Apply a layout pass.
    pub fn layout(&mut self, screen: Rect, size: Size) {
        self.measured = size;
        self.bounds = Self::anchor(screen, size);
    }

    /// Content size as last measured.
    #[inline]
    pub fn measured(&self) -> Size {
        self.measured
    }

    /// Container bounds in window coordinates.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Stop painting the live content without removing it.
    pub fn hide_content(&mut self) {
        self.visible = false;
    }
}

/// Result of feeding one pointer event to [`OutsideTapTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapClass {
    /// Nothing decided yet, or the event did not touch the outside.
    Pending,
    /// Pointer activity outside the sheet that is not a complete tap.
    OutsideActivity,
    /// Press and release both outside the sheet.
    OutsideTap,
    /// Activity that belongs to the sheet's content.
    Inside,
}

impl TapClass {
    /// Whether the overlay, rather than the content, owns the event.
    pub fn is_outside(self) -> bool {
        matches!(self, Self::OutsideActivity | Self::OutsideTap)
    }
}

/// Tracks one press/release sequence against the container bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutsideTapTracker {
    pressed_outside: Option<bool>,
}

impl OutsideTapTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `event` against `bounds`.
    ///
    /// Only a press outside followed by a release outside is a tap. A press
    /// outside that is released inside is a drag and dismisses nothing.
    pub fn classify(&mut self, event: &PointerEvent, bounds: Rect) -> TapClass {
        let outside = !bounds.contains(event.position);
        match event.kind {
            PointerEventKind::Down => {
                self.pressed_outside = Some(outside);
                if outside {
                    TapClass::OutsideActivity
                } else {
                    TapClass::Inside
                }
            }
            PointerEventKind::Move => match self.pressed_outside {
                Some(true) => TapClass::OutsideActivity,
                Some(false) => TapClass::Inside,
                None => TapClass::Pending,
            },
            PointerEventKind::Up => match self.pressed_outside.take() {
                Some(true) if outside => TapClass::OutsideTap,
                Some(true) => TapClass::OutsideActivity,
                Some(false) => TapClass::Inside,
                None => TapClass::Pending,
            },
            PointerEventKind::Cancel => {
                let was_outside = self.pressed_outside.take() == Some(true);
                if was_outside {
                    TapClass::OutsideActivity
                } else {
                    TapClass::Pending
                }
            }
        }
    }

    /// Forget any press in progress.
    pub fn reset(&mut self) {
        self.pressed_outside = None;
    }
}
