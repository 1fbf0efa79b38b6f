#![forbid(unsafe_code)]

//! Process-unique identities for persisted overlay state.
//!
//! Each show-request receives a fresh [`StateIdentity`]. Two overlays whose
//! content is otherwise identical (same navigation key, same screen) still
//! map to distinct persisted-state records.

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for identities.
static STATE_IDENTITY_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifier attached to an overlay's content container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateIdentity(u64);

impl StateIdentity {
    /// Allocate a new process-unique identity.
    #[must_use]
    pub fn next() -> Self {
        Self(STATE_IDENTITY_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw identity value.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Key used in the saved-state registry.
    #[must_use]
    pub fn registry_key(self) -> String {
        format!("sheet-overlay:{}", self.0)
    }
}

impl fmt::Display for StateIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identities_are_unique() {
        let a = StateIdentity::next();
        let b = StateIdentity::next();
        let c = StateIdentity::next();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert!(b.id() > a.id());
    }

    #[test]
    fn registry_key_embeds_id() {
        let id = StateIdentity::next();
        assert_eq!(id.registry_key(), format!("sheet-overlay:{}", id.id()));
    }
}
