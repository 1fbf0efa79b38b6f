#![forbid(unsafe_code)]

//! Lifecycle owner shared between a screen and the overlays it presents.
//!
//! # Invariants
//!
//! 1. Observers are notified in registration order, once per state change.
//! 2. Moving to the current state is a no-op (no notification).
//! 3. `Destroyed` is terminal: later transitions are ignored.
//! 4. Dropping a [`LifecycleObservation`] removes its observer before the
//!    next notification.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Lifecycle states in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LifecycleState {
    #[default]
    Initialized,
    Created,
    Started,
    Resumed,
    Destroyed,
}

impl LifecycleState {
    /// At least `Started` and not destroyed.
    #[inline]
    pub fn is_at_least_started(self) -> bool {
        matches!(self, Self::Started | Self::Resumed)
    }
}

type Observer = Rc<dyn Fn(LifecycleState)>;

struct LifecycleInner {
    state: LifecycleState,
    observers: Vec<(u64, Observer)>,
    next_observer: u64,
}

/// Shared lifecycle handle.
#[derive(Clone)]
pub struct Lifecycle {
    inner: Rc<RefCell<LifecycleInner>>,
}

impl std::fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Lifecycle")
            .field("state", &inner.state)
            .field("observers", &inner.observers.len())
            .finish()
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// A new lifecycle in `Initialized`.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(LifecycleInner {
                state: LifecycleState::Initialized,
                observers: Vec::new(),
                next_observer: 0,
            })),
        }
    }

    /// Current state.
    pub fn state(&self) -> LifecycleState {
        self.inner.borrow().state
    }

    /// Whether the lifecycle has reached `Destroyed`.
    pub fn is_destroyed(&self) -> bool {
        self.state() == LifecycleState::Destroyed
    }

    /// Move to `state`, notifying observers if it changed.
    ///
    /// Returns `false` when the move was ignored (no change, or already
    /// destroyed).
    pub fn move_to(&self, state: LifecycleState) -> bool {
        let observers: Vec<Observer> = {
            let mut inner = self.inner.borrow_mut();
            if inner.state == state {
                return false;
            }
            if inner.state == LifecycleState::Destroyed {
                tracing::debug!(?state, "ignoring transition out of Destroyed");
                return false;
            }
            inner.state = state;
            inner.observers.iter().map(|(_, o)| Rc::clone(o)).collect()
        };
        // Borrow released: observers may read the lifecycle.
        for observer in observers {
            observer(state);
        }
        true
    }

    /// Register an observer; it stays registered while the returned guard
    /// lives.
    #[must_use = "dropping the observation unregisters the observer"]
    pub fn observe(&self, observer: impl Fn(LifecycleState) + 'static) -> LifecycleObservation {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_observer;
        inner.next_observer += 1;
        inner.observers.push((id, Rc::new(observer)));
        LifecycleObservation {
            lifecycle: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().observers.len()
    }
}

/// RAII guard returned by [`Lifecycle::observe`].
pub struct LifecycleObservation {
    lifecycle: Weak<RefCell<LifecycleInner>>,
    id: u64,
}

impl Drop for LifecycleObservation {
    fn drop(&mut self) {
        if let Some(inner) = self.lifecycle.upgrade() {
            inner.borrow_mut().observers.retain(|(id, _)| *id != self.id);
        }
    }
}
