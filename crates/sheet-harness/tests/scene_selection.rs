#![forbid(unsafe_code)]

//! Integration tests: back-stack driven overlays.
//!
//! A [`BackStack`] recomputes its scene on every push and pop. When the top
//! entry carries overlay metadata the test presents an [`OverlayHost`] with
//! the entry's properties; when it stops being on top the host is dismissed.

use std::time::Duration;

use sheet_core::geometry::Size;
use sheet_core::{Instant, OverlayProperties, SecurePolicy};
use sheet_harness::{
    BackStack, EventLog, FakeWindow, FakeWindowProvider, LogEntry, RecordingContent,
    drive_until_released,
};
use sheet_nav::{NavEntry, SceneUpdate};
use sheet_runtime::{ContentContext, SheetConfig};
use sheet_widgets::{OverlayHost, OverlayPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Home,
    Settings,
    Picker,
}

/// Present the current overlay scene, if any.
fn present(
    stack: &BackStack<Route>,
    provider: &mut FakeWindowProvider,
    parent: &ContentContext,
    log: &EventLog,
) -> Option<OverlayHost<FakeWindow>> {
    let scene = stack.scene_cache().current()?.as_overlay()?;
    let name = format!("{:?}", scene.key());
    let mut host = OverlayHost::new(
        provider,
        parent,
        scene.properties(),
        log.dismiss_callback(),
        |ctx| RecordingContent::new(name, ctx, log).boxed(),
    )
    .expect("window available");
    host.show().expect("show");
    host.on_layout(Size::new(300, 200));
    Some(host)
}

// ============================================================================
// Scene changes
// ============================================================================

#[test]
fn plain_entries_never_produce_an_overlay() {
    let mut stack = BackStack::new();
    assert_eq!(stack.push(NavEntry::new(Route::Home)), SceneUpdate::Changed);
    assert_eq!(stack.push(NavEntry::new(Route::Settings)), SceneUpdate::Changed);

    let scene = stack.scene_cache().current().expect("scene");
    assert!(!scene.is_overlay());
    assert_eq!(*scene.key(), Route::Settings);
}

#[test]
fn overlay_entry_on_top_is_presented_with_its_properties() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log).parent_secure(false);
    let parent = ContentContext::root();
    let props = OverlayProperties::default()
        .secure_policy(SecurePolicy::ForceOn)
        .dismiss_on_outside_tap(false);

    let mut stack = BackStack::new();
    stack.push(NavEntry::new(Route::Home));
    stack.push(NavEntry::overlay(Route::Picker, props));

    let scene = stack
        .scene_cache()
        .current()
        .and_then(|s| s.as_overlay())
        .expect("overlay scene");
    assert_eq!(scene.previous_entries().len(), 1);
    assert_eq!(scene.overlaid_entries()[0].key, Route::Home);

    let host = present(&stack, &mut provider, &parent, &log).expect("host");
    assert_eq!(host.properties(), props);
    assert_eq!(host.phase(), OverlayPhase::Entering);
    assert_eq!(provider.window_state(0).and_then(|s| s.secure), Some(true));
}

#[test]
fn overlay_below_the_top_is_not_presented() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();

    let config = SheetConfig::default().default_properties(
        OverlayProperties::default().dismiss_on_back_signal(false),
    );

    let mut stack = BackStack::new();
    stack.push(NavEntry::overlay(Route::Picker, config.default_properties));
    assert_eq!(
        stack
            .scene_cache()
            .current()
            .and_then(|s| s.as_overlay())
            .map(|s| s.properties()),
        Some(config.default_properties)
    );
    stack.push(NavEntry::new(Route::Settings));

    assert!(present(&stack, &mut provider, &parent, &log).is_none());
    assert_eq!(provider.created(), 0);
}

#[test]
fn popping_the_overlay_dismisses_its_host() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();

    let mut stack = BackStack::new();
    stack.push(NavEntry::new(Route::Home));
    stack.push(NavEntry::overlay(Route::Picker, OverlayProperties::default()));
    let mut host = present(&stack, &mut provider, &parent, &log).expect("host");
    let t0 = Instant::now();
    host.on_frame(t0);
    host.on_frame(t0 + Duration::from_millis(150));
    let generation = stack.scene_cache().generation();

    let (popped, update) = stack.pop();
    assert_eq!(popped.map(|e| e.key), Some(Route::Picker));
    assert_eq!(update, SceneUpdate::Changed);
    assert_eq!(stack.scene_cache().generation(), generation + 1);
    assert!(!stack.scene_cache().current().is_some_and(|s| s.is_overlay()));

    host.dismiss();
    assert_eq!(log.count(|e| *e == LogEntry::ContentDisposed("Picker".into())), 1);
    drive_until_released(&mut host, t0 + Duration::from_millis(150), 20);
    assert_eq!(host.phase(), OverlayPhase::Released);
    assert_eq!(provider.attached(), 0);
}

#[test]
fn every_stack_change_bumps_generation() {
    let mut stack = BackStack::new();
    stack.push(NavEntry::new(Route::Home));
    let generation = stack.scene_cache().generation();

    stack.push(NavEntry::new(Route::Settings));
    stack.pop();
    let (_, update) = stack.pop();
    assert_eq!(update, SceneUpdate::Changed);
    assert!(stack.scene_cache().current().is_none());
    assert_eq!(stack.scene_cache().generation(), generation + 3);
}
