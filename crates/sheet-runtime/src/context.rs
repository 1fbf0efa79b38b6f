#![forbid(unsafe_code)]

//! Ambient context handed to overlay content.
//!
//! Content shown in an overlay window is not a descendant of the screen
//! that requested it, so nothing is inherited implicitly. The host builds
//! a [`ContentContext`] explicitly: it shares the requesting screen's
//! lifecycle, state scope, and saved-state registry, and carries the
//! overlay's own [`StateIdentity`] so persisted state survives recreation.

use sheet_core::{LayoutDirection, StateIdentity};

use crate::lifecycle::Lifecycle;
use crate::scope::{SavedStateRegistry, ScopeError, StateScope};

/// Lifecycle, scoped state, and saved-state access for a piece of content.
#[derive(Debug, Clone, Default)]
pub struct ContentContext {
    lifecycle: Lifecycle,
    scope: StateScope,
    saved: SavedStateRegistry,
    identity: Option<StateIdentity>,
    layout_direction: LayoutDirection,
}

impl ContentContext {
    /// Build a context from explicit parts.
    pub fn new(lifecycle: Lifecycle, scope: StateScope, saved: SavedStateRegistry) -> Self {
        Self {
            lifecycle,
            scope,
            saved,
            identity: None,
            layout_direction: LayoutDirection::default(),
        }
    }

    /// A fresh root context with its own lifecycle, scope, and registry.
    pub fn root() -> Self {
        Self::default()
    }

    /// Derive the context for an overlay's content.
    ///
    /// Shares every handle with `self` and attaches `identity`.
    #[must_use]
    pub fn for_overlay(&self, identity: StateIdentity) -> Self {
        Self {
            identity: Some(identity),
            ..self.clone()
        }
    }

    /// Override the layout direction.
    #[must_use]
    pub fn with_layout_direction(mut self, direction: LayoutDirection) -> Self {
        self.layout_direction = direction;
        self
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn scope(&self) -> &StateScope {
        &self.scope
    }

    pub fn saved_state(&self) -> &SavedStateRegistry {
        &self.saved
    }

    /// Identity of the overlay this context belongs to, if any.
    pub fn identity(&self) -> Option<StateIdentity> {
        self.identity
    }

    pub fn layout_direction(&self) -> LayoutDirection {
        self.layout_direction
    }

    /// Register a saved-state provider, refusing once the lifecycle is gone.
    pub fn register_saved(
        &self,
        key: &str,
        provider: impl Fn() -> String + 'static,
    ) -> Result<(), ScopeError> {
        if self.lifecycle.is_destroyed() {
            return Err(ScopeError::Destroyed);
        }
        self.saved.register(key, provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::LifecycleState;

    #[test]
    fn overlay_context_shares_handles() {
        let root = ContentContext::root().with_layout_direction(LayoutDirection::Rtl);
        let identity = StateIdentity::next();
        let child = root.for_overlay(identity);

        assert_eq!(child.identity(), Some(identity));
        assert_eq!(root.identity(), None);
        assert_eq!(child.layout_direction(), LayoutDirection::Rtl);

        root.lifecycle().move_to(LifecycleState::Resumed);
        assert_eq!(child.lifecycle().state(), LifecycleState::Resumed);

        child.saved_state().register("k", || "v".into()).unwrap();
        assert!(root.saved_state().is_registered("k"));
    }

    #[test]
    fn register_after_destroy_fails() {
        let context = ContentContext::root();
        context.lifecycle().move_to(LifecycleState::Destroyed);
        assert_eq!(
            context.register_saved("k", String::new),
            Err(ScopeError::Destroyed)
        );
        assert!(!context.saved_state().is_registered("k"));
    }
}
