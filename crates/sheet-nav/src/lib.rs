#![forbid(unsafe_code)]

//! Scene selection for sheetkit.
//!
//! A navigation system hands over its ordered back stack as a slice of
//! [`NavEntry`]. A [`SceneChain`] asks each [`SceneStrategy`] in turn for a
//! [`Scene`]; the first answer wins. [`OverlaySceneStrategy`] recognises
//! entries tagged with overlay metadata and describes them as bottom-sheet
//! scenes without touching windows or animation.

pub mod cache;
pub mod entry;
pub mod scene;
pub mod strategy;

pub use cache::{SceneCache, SceneUpdate};
pub use entry::{Metadata, MetadataValue, NavEntry, OVERLAY_METADATA_KEY};
pub use scene::{OverlayScene, Scene, SinglePaneScene};
pub use strategy::{OverlaySceneStrategy, SceneChain, SceneStrategy, SinglePaneStrategy};
