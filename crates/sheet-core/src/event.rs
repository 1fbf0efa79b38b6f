#![forbid(unsafe_code)]

//! Input events delivered to an overlay.
//!
//! The hosting environment serialises all input on one thread; handlers
//! observe events one at a time in delivery order.

use bitflags::bitflags;

use crate::geometry::Point;

bitflags! {
    /// Keyboard modifier state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL = 0b0010;
        const ALT = 0b0100;
        const SUPER = 0b1000;
    }
}

/// Key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    /// Hardware or system back key.
    Back,
    Enter,
    Tab,
    Char(char),
}

/// Key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A key press with no modifiers.
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    /// Set the transition kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether this is an initial press (not a repeat or release).
    #[inline]
    pub const fn is_press(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press)
    }
}

/// Pointer (touch or mouse) transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
    /// The gesture was taken away by the system.
    Cancel,
}

/// A pointer event in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Point,
}

impl PointerEvent {
    /// Create a pointer event at `(x, y)`.
    pub const fn new(kind: PointerEventKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
        }
    }
}

/// System back gesture progress.
///
/// Predictive back delivers `Started`, any number of `Progressed`, and then
/// either `Invoked` (commit) or `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackEvent {
    Started,
    /// Gesture progress in `[0.0, 1.0]`.
    Progressed(f32),
    Cancelled,
    Invoked,
}

/// Any event the overlay window can receive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Key(KeyEvent),
    Pointer(PointerEvent),
    Back(BackEvent),
    /// Window focus changed (`true` = gained).
    Focus(bool),
}

impl From<KeyEvent> for Event {
    fn from(event: KeyEvent) -> Self {
        Self::Key(event)
    }
}

impl From<PointerEvent> for Event {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

impl From<BackEvent> for Event {
    fn from(event: BackEvent) -> Self {
        Self::Back(event)
    }
}
