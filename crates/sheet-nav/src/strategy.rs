#![forbid(unsafe_code)]

//! Scene strategies and their first-match chain.
//!
//! # Invariants
//!
//! - Strategies are pure functions of the entry slice: equal inputs give
//!   equal scenes.
//! - [`OverlaySceneStrategy`] looks only at the top entry.
//! - [`SceneChain::compute`] returns the first non-`None` answer, in the
//!   order strategies were added.

use core::fmt;

use crate::entry::NavEntry;
use crate::scene::{OverlayScene, Scene, SinglePaneScene};

/// Turns an ordered entry list into a scene, or declines.
pub trait SceneStrategy<K> {
    fn compute_scene(&self, entries: &[NavEntry<K>]) -> Option<Scene<K>>;
}

impl<K, F> SceneStrategy<K> for F
where
    F: Fn(&[NavEntry<K>]) -> Option<Scene<K>>,
{
    fn compute_scene(&self, entries: &[NavEntry<K>]) -> Option<Scene<K>> {
        self(entries)
    }
}

/// Shows the top entry as a bottom sheet when it carries overlay metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlaySceneStrategy;

impl<K: Clone> SceneStrategy<K> for OverlaySceneStrategy {
    fn compute_scene(&self, entries: &[NavEntry<K>]) -> Option<Scene<K>> {
        let (top, rest) = entries.split_last()?;
        let properties = top.overlay_properties()?;
        Some(Scene::Overlay(OverlayScene::new(
            top.clone(),
            rest.to_vec(),
            properties,
        )))
    }
}

/// Shows the top entry full screen. Declines only for an empty stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePaneStrategy;

impl<K: Clone> SceneStrategy<K> for SinglePaneStrategy {
    fn compute_scene(&self, entries: &[NavEntry<K>]) -> Option<Scene<K>> {
        let (top, rest) = entries.split_last()?;
        Some(Scene::SinglePane(SinglePaneScene::new(top.clone(), rest.to_vec())))
    }
}

/// Ordered strategies, first match wins.
pub struct SceneChain<K> {
    strategies: Vec<Box<dyn SceneStrategy<K>>>,
}

impl<K> fmt::Debug for SceneChain<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneChain")
            .field("strategies", &self.strategies.len())
            .finish()
    }
}

impl<K> Default for SceneChain<K> {
    fn default() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }
}

impl<K: Clone + 'static> SceneChain<K> {
    /// An empty chain; computes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay scenes first, falling back to single panes.
    pub fn with_defaults() -> Self {
        Self::new()
            .with(OverlaySceneStrategy)
            .with(SinglePaneStrategy)
    }

    /// Append a strategy.
    #[must_use]
    pub fn with(mut self, strategy: impl SceneStrategy<K> + 'static) -> Self {
        self.push(strategy);
        self
    }

    pub fn push(&mut self, strategy: impl SceneStrategy<K> + 'static) {
        self.strategies.push(Box::new(strategy));
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// First scene any strategy produces for `entries`.
    pub fn compute(&self, entries: &[NavEntry<K>]) -> Option<Scene<K>> {
        self.strategies
            .iter()
            .find_map(|strategy| strategy.compute_scene(entries))
    }
}
