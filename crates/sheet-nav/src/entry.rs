#![forbid(unsafe_code)]

//! Navigation entries and their metadata bag.
//!
//! The metadata contract: an entry is an overlay exactly when its metadata
//! holds [`MetadataValue::Overlay`] under [`OVERLAY_METADATA_KEY`].

use std::collections::BTreeMap;

use sheet_core::OverlayProperties;

/// Metadata key marking an entry as a bottom-sheet overlay.
pub const OVERLAY_METADATA_KEY: &str = "sheetkit.overlay";

/// A value in an entry's metadata bag.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MetadataValue {
    Overlay(OverlayProperties),
    Text(String),
    Bool(bool),
    Int(i64),
}

/// Opaque, ordered key/value metadata attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metadata {
    values: BTreeMap<String, MetadataValue>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata marking an entry as an overlay with `properties`.
    pub fn overlay(properties: OverlayProperties) -> Self {
        Self::new().with(OVERLAY_METADATA_KEY, MetadataValue::Overlay(properties))
    }

    /// Add or replace a value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: MetadataValue,
    ) -> Option<MetadataValue> {
        self.values.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<MetadataValue> {
        self.values.remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overlay properties under [`OVERLAY_METADATA_KEY`], if present.
    ///
    /// A value of another kind under that key does not mark an overlay.
    pub fn overlay_properties(&self) -> Option<OverlayProperties> {
        match self.values.get(OVERLAY_METADATA_KEY) {
            Some(MetadataValue::Overlay(properties)) => Some(*properties),
            _ => None,
        }
    }
}

/// One entry of the navigation back stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry<K> {
    pub key: K,
    pub metadata: Metadata,
}

impl<K> NavEntry<K> {
    /// A plain entry with empty metadata.
    pub fn new(key: K) -> Self {
        Self {
            key,
            metadata: Metadata::new(),
        }
    }

    /// An entry shown as a bottom sheet.
    pub fn overlay(key: K, properties: OverlayProperties) -> Self {
        Self {
            key,
            metadata: Metadata::overlay(properties),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn overlay_properties(&self) -> Option<OverlayProperties> {
        self.metadata.overlay_properties()
    }

    pub fn is_overlay(&self) -> bool {
        self.overlay_properties().is_some()
    }
}
