#![forbid(unsafe_code)]

//! Scene change detection.
//!
//! [`SceneCache`] recomputes the scene from scratch on every update and
//! compares it structurally with the previous one, so the hosting
//! framework can skip work when a stack change does not affect what is
//! shown.

use core::fmt::Debug;

use crate::entry::NavEntry;
use crate::scene::Scene;
use crate::strategy::SceneChain;

/// Whether an update changed the current scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneUpdate {
    Unchanged,
    Changed,
}

/// The latest scene for a back stack.
#[derive(Debug)]
pub struct SceneCache<K> {
    chain: SceneChain<K>,
    current: Option<Scene<K>>,
    generation: u64,
}

impl<K: Clone + PartialEq + Debug + 'static> SceneCache<K> {
    pub fn new(chain: SceneChain<K>) -> Self {
        Self {
            chain,
            current: None,
            generation: 0,
        }
    }

    /// Recompute for `entries` and report whether the scene changed.
    pub fn update(&mut self, entries: &[NavEntry<K>]) -> SceneUpdate {
        let next = self.chain.compute(entries);
        if next == self.current {
            return SceneUpdate::Unchanged;
        }
        self.generation += 1;
        tracing::debug!(
            generation = self.generation,
            key = ?next.as_ref().map(Scene::key),
            overlay = next.as_ref().is_some_and(Scene::is_overlay),
            "scene changed"
        );
        self.current = next;
        SceneUpdate::Changed
    }

    pub fn current(&self) -> Option<&Scene<K>> {
        self.current.as_ref()
    }

    /// Number of changes seen so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<K: Clone + PartialEq + Debug + 'static> Default for SceneCache<K> {
    fn default() -> Self {
        Self::new(SceneChain::with_defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheet_core::OverlayProperties;

    #[test]
    fn identical_stacks_are_unchanged() {
        let mut cache = SceneCache::default();
        let entries = vec![
            NavEntry::new("home"),
            NavEntry::overlay("sheet", OverlayProperties::default()),
        ];
        assert_eq!(cache.update(&entries), SceneUpdate::Changed);
        assert_eq!(cache.update(&entries.clone()), SceneUpdate::Unchanged);
        assert_eq!(cache.generation(), 1);
    }

    #[test]
    fn property_change_is_a_change() {
        let mut cache = SceneCache::default();
        let mut entries = vec![NavEntry::overlay(1u8, OverlayProperties::default())];
        cache.update(&entries);
        entries[0] = NavEntry::overlay(
            1u8,
            OverlayProperties::default().dismiss_on_outside_tap(false),
        );
        assert_eq!(cache.update(&entries), SceneUpdate::Changed);
        let overlay = cache.current().unwrap().as_overlay().unwrap();
        assert!(!overlay.properties().dismiss_on_outside_tap);
    }

    #[test]
    fn popping_the_sheet_changes_scene() {
        let mut cache = SceneCache::default();
        let mut entries = vec![
            NavEntry::new("home"),
            NavEntry::overlay("sheet", OverlayProperties::default()),
        ];
        cache.update(&entries);
        entries.pop();
        assert_eq!(cache.update(&entries), SceneUpdate::Changed);
        assert!(!cache.current().unwrap().is_overlay());
        entries.clear();
        assert_eq!(cache.update(&entries), SceneUpdate::Changed);
        assert!(cache.current().is_none());
    }

    #[test]
    fn empty_stack_starts_unchanged() {
        let mut cache: SceneCache<u8> = SceneCache::default();
        assert_eq!(cache.update(&[]), SceneUpdate::Unchanged);
        assert_eq!(cache.generation(), 0);
    }
}
