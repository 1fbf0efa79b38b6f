#![forbid(unsafe_code)]

//! Screen-scoped state holders and persisted-state records.
//!
//! [`StateScope`] owns the state holders a screen creates (view-model
//! style objects that outlive individual renders but not the screen).
//! [`SavedStateRegistry`] maps string keys to providers whose output is
//! persisted across process recreation.
//!
//! # Invariants
//!
//! 1. **Key uniqueness**: a registry key is held by at most one provider.
//!    Registering a key that is still registered fails with
//!    [`ScopeError::DuplicateKey`]; the existing provider is kept.
//! 2. **Single clear**: [`StateScope::clear`] calls each holder's
//!    `on_cleared` exactly once, in insertion order, and empties the scope.
//! 3. Handles are cheap clones sharing one underlying store.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Duplicate key | Old owner not torn down yet | `Err(DuplicateKey)` |
//! | Type mismatch | Same key, different holder type | `Err(TypeMismatch)` |
//! | Destroyed owner | Register after the screen died | `Err(Destroyed)` |
//! | Missing restored value | First run / key changed | `None` |

use core::fmt;
use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use ahash::AHashMap;

/// Errors from scope and registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// The key is already registered by a live owner.
    DuplicateKey(String),
    /// A holder exists under this key with a different type.
    TypeMismatch(String),
    /// The owning lifecycle is already destroyed.
    Destroyed,
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey(key) => write!(f, "saved-state key '{key}' is already registered"),
            Self::TypeMismatch(key) => write!(f, "scoped state '{key}' has a different type"),
            Self::Destroyed => write!(f, "owner lifecycle is destroyed"),
        }
    }
}

impl std::error::Error for ScopeError {}

// ---------------------------------------------------------------------------
// StateScope
// ---------------------------------------------------------------------------

/// A state holder living in a [`StateScope`].
pub trait ScopedState: 'static {
    /// Called once when the owning scope is cleared.
    fn on_cleared(&mut self) {}
}

struct ScopedEntry {
    holder: Rc<dyn Any>,
    clear: Box<dyn Fn()>,
}

#[derive(Default)]
struct ScopeInner {
    entries: AHashMap<String, ScopedEntry>,
    order: Vec<String>,
}

/// Keyed store of screen-scoped state holders.
#[derive(Clone, Default)]
pub struct StateScope {
    inner: Rc<RefCell<ScopeInner>>,
}

impl fmt::Debug for StateScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateScope")
            .field("keys", &self.inner.borrow().order)
            .finish()
    }
}

impl StateScope {
    /// An empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the holder under `key`, creating it with `init` if absent.
    pub fn get_or_insert_with<T: ScopedState>(
        &self,
        key: &str,
        init: impl FnOnce() -> T,
    ) -> Result<Rc<RefCell<T>>, ScopeError> {
        if let Some(entry) = self.inner.borrow().entries.get(key) {
            return Rc::clone(&entry.holder)
                .downcast::<RefCell<T>>()
                .map_err(|_| ScopeError::TypeMismatch(key.to_owned()));
        }

        let holder = Rc::new(RefCell::new(init()));
        let for_clear = Rc::clone(&holder);
        let entry = ScopedEntry {
            holder: holder.clone() as Rc<dyn Any>,
            clear: Box::new(move || for_clear.borrow_mut().on_cleared()),
        };
        let mut inner = self.inner.borrow_mut();
        inner.entries.insert(key.to_owned(), entry);
        inner.order.push(key.to_owned());
        Ok(holder)
    }

    /// Whether a holder exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.borrow().entries.contains_key(key)
    }

    /// Number of holders.
    pub fn len(&self) -> usize {
        self.inner.borrow().order.len()
    }

    /// Whether the scope holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and clear a single holder.
    pub fn remove(&self, key: &str) -> bool {
        let entry = {
            let mut inner = self.inner.borrow_mut();
            inner.order.retain(|k| k != key);
            inner.entries.remove(key)
        };
        match entry {
            Some(entry) => {
                (entry.clear)();
                true
            }
            None => false,
        }
    }

    /// Clear every holder in insertion order and empty the scope.
    pub fn clear(&self) {
        let drained: Vec<ScopedEntry> = {
            let mut inner = self.inner.borrow_mut();
            let order = std::mem::take(&mut inner.order);
            order
                .iter()
                .filter_map(|key| inner.entries.remove(key))
                .collect()
        };
        // Borrow released: holders may touch the scope while clearing.
        let count = drained.len();
        for entry in drained {
            (entry.clear)();
        }
        if count > 0 {
            tracing::debug!(count, "state scope cleared");
        }
    }
}

// ---------------------------------------------------------------------------
// SavedStateRegistry
// ---------------------------------------------------------------------------

/// Produces the value persisted under a registry key.
pub type SaveProvider = Box<dyn Fn() -> String>;

/// A snapshot of every registered provider's output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "state-persistence", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedBundle {
    pub entries: BTreeMap<String, String>,
}

impl SavedBundle {
    /// Serialise to JSON.
    #[cfg(feature = "state-persistence")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialise from JSON.
    #[cfg(feature = "state-persistence")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Default)]
struct RegistryInner {
    providers: AHashMap<String, SaveProvider>,
    restored: AHashMap<String, String>,
}

/// Registry of persisted-state providers keyed by string.
#[derive(Clone, Default)]
pub struct SavedStateRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl fmt::Debug for SavedStateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SavedStateRegistry")
            .field("registered", &inner.providers.len())
            .field("restored", &inner.restored.len())
            .finish()
    }
}

impl SavedStateRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with restored values.
    pub fn restored_from(bundle: SavedBundle) -> Self {
        let registry = Self::new();
        registry.inner.borrow_mut().restored = bundle.entries.into_iter().collect();
        registry
    }

    /// Register `provider` under `key`.
    pub fn register(
        &self,
        key: &str,
        provider: impl Fn() -> String + 'static,
    ) -> Result<(), ScopeError> {
        let mut inner = self.inner.borrow_mut();
        if inner.providers.contains_key(key) {
            tracing::warn!(key, "duplicate saved-state key");
            return Err(ScopeError::DuplicateKey(key.to_owned()));
        }
        inner.providers.insert(key.to_owned(), Box::new(provider));
        Ok(())
    }

    /// Remove the provider under `key`. Returns whether one existed.
    pub fn unregister(&self, key: &str) -> bool {
        self.inner.borrow_mut().providers.remove(key).is_some()
    }

    /// Whether `key` currently has a provider.
    pub fn is_registered(&self, key: &str) -> bool {
        self.inner.borrow().providers.contains_key(key)
    }

    /// Number of registered providers.
    pub fn registered_count(&self) -> usize {
        self.inner.borrow().providers.len()
    }

    /// Take the restored value for `key`, if any. A value is handed out once.
    pub fn consume_restored(&self, key: &str) -> Option<String> {
        self.inner.borrow_mut().restored.remove(key)
    }

    /// Collect every provider's current output.
    pub fn save(&self) -> SavedBundle {
        let inner = self.inner.borrow();
        SavedBundle {
            entries: inner
                .providers
                .iter()
                .map(|(key, provider)| (key.clone(), provider()))
                .collect(),
        }
    }
}
