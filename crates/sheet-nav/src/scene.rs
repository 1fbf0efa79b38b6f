#![forbid(unsafe_code)]

//! Scene descriptions.
//!
//! A scene is a plain value: it is rebuilt from the entry list on every
//! change and compared structurally, never patched in place.

use sheet_core::OverlayProperties;

use crate::entry::NavEntry;

/// The top entry shown as a bottom sheet over the rest of the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayScene<K> {
    entry: NavEntry<K>,
    beneath: Vec<NavEntry<K>>,
    properties: OverlayProperties,
}

impl<K> OverlayScene<K> {
    pub fn new(
        entry: NavEntry<K>,
        beneath: Vec<NavEntry<K>>,
        properties: OverlayProperties,
    ) -> Self {
        Self {
            entry,
            beneath,
            properties,
        }
    }

    /// Key of the entry rendered inside the sheet.
    pub fn key(&self) -> &K {
        &self.entry.key
    }

    pub fn entry(&self) -> &NavEntry<K> {
        &self.entry
    }

    /// Entries preceding the sheet in the stack, bottom first.
    pub fn previous_entries(&self) -> &[NavEntry<K>] {
        &self.beneath
    }

    /// Entries drawn underneath the sheet.
    ///
    /// A sheet never reorders the stack, so this is the same list as
    /// [`previous_entries`](Self::previous_entries).
    pub fn overlaid_entries(&self) -> &[NavEntry<K>] {
        &self.beneath
    }

    pub fn properties(&self) -> OverlayProperties {
        self.properties
    }
}

/// A single full-screen entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinglePaneScene<K> {
    entry: NavEntry<K>,
    previous: Vec<NavEntry<K>>,
}

impl<K> SinglePaneScene<K> {
    pub fn new(entry: NavEntry<K>, previous: Vec<NavEntry<K>>) -> Self {
        Self { entry, previous }
    }

    pub fn key(&self) -> &K {
        &self.entry.key
    }

    pub fn entry(&self) -> &NavEntry<K> {
        &self.entry
    }

    pub fn previous_entries(&self) -> &[NavEntry<K>] {
        &self.previous
    }
}

/// What the hosting framework should render for the current stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scene<K> {
    Overlay(OverlayScene<K>),
    SinglePane(SinglePaneScene<K>),
}

impl<K> Scene<K> {
    /// Key of the entry this scene is about.
    pub fn key(&self) -> &K {
        match self {
            Self::Overlay(scene) => scene.key(),
            Self::SinglePane(scene) => scene.key(),
        }
    }

    pub fn as_overlay(&self) -> Option<&OverlayScene<K>> {
        match self {
            Self::Overlay(scene) => Some(scene),
            Self::SinglePane(_) => None,
        }
    }

    pub fn is_overlay(&self) -> bool {
        matches!(self, Self::Overlay(_))
    }
}
