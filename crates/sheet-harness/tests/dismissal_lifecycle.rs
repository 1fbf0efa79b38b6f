#![forbid(unsafe_code)]

//! Integration tests: end-to-end bottom-sheet dismissal against fake
//! windows.
//!
//! Every test drives an [`OverlayHost`] the way a caller would: show, feed
//! layout and frames, route input, call `dismiss` when the dismiss callback
//! fires, and assert on the shared [`EventLog`].

use std::time::Duration;

use proptest::prelude::*;
use sheet_core::event::{BackEvent, Event, KeyCode, KeyEvent, PointerEvent, PointerEventKind};
use sheet_core::geometry::{Point, Size};
use sheet_core::{Instant, OverlayProperties};
use sheet_harness::{
    DEFAULT_SCREEN, EventLog, FakeWindow, FakeWindowProvider, LogEntry, RecordingContent,
    WindowCall, drive_until_released, drive_while_animating, render_host, surface_digest,
};
use sheet_runtime::{ContentContext, LifecycleState, ScopeError, SheetConfig};
use sheet_widgets::{
    AnimationTarget, DismissSource, OverlayEvent, OverlayHost, OverlayPhase, TransitionDirection,
    TransitionEnd,
};

fn outside_tap() -> [Event; 2] {
    [
        Event::Pointer(PointerEvent::new(PointerEventKind::Down, 10.0, 10.0)),
        Event::Pointer(PointerEvent::new(PointerEventKind::Up, 10.0, 10.0)),
    ]
}

fn send(host: &mut OverlayHost<FakeWindow>, events: &[Event]) {
    for event in events {
        host.handle_event(event);
    }
}

fn new_host(
    provider: &mut FakeWindowProvider,
    parent: &ContentContext,
    log: &EventLog,
    name: &str,
) -> OverlayHost<FakeWindow> {
    let name = name.to_owned();
    OverlayHost::new(
        provider,
        parent,
        OverlayProperties::default(),
        log.dismiss_callback(),
        |ctx| RecordingContent::new(name, ctx, log).boxed(),
    )
    .expect("window available")
    .with_listener(log.listener())
}

/// Show and run the enter transition to completion.
fn bring_up(host: &mut OverlayHost<FakeWindow>, size: Size) -> Instant {
    host.show().expect("show");
    host.on_layout(size);
    let t0 = Instant::now();
    host.on_frame(t0);
    host.on_frame(t0 + Duration::from_millis(150));
    assert_eq!(host.phase(), OverlayPhase::Shown);
    t0 + Duration::from_millis(150)
}

fn is_overlay(pred: impl Fn(&OverlayEvent) -> bool) -> impl Fn(&LogEntry) -> bool {
    move |entry| matches!(entry, LogEntry::Overlay(event) if pred(event))
}

fn is_exit_frame(event: &OverlayEvent) -> bool {
    matches!(
        event,
        OverlayEvent::FrameCommitted {
            direction: TransitionDirection::Exit,
            ..
        }
    )
}

// ============================================================================
// Outside tap on a captured sheet
// ============================================================================

#[test]
fn outside_tap_dismisses_through_snapshot_proxy() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();
    let mut host = new_host(&mut provider, &parent, &log, "profile");
    let t = bring_up(&mut host, Size::new(300, 200));

    send(&mut host, &outside_tap());
    send(&mut host, &outside_tap());
    assert_eq!(log.count(|e| *e == LogEntry::DismissCallback), 1);
    assert!(log.overlay_events().contains(&OverlayEvent::DismissSuppressed {
        source: DismissSource::OutsideTap
    }));

    host.dismiss();
    assert_eq!(host.animation_target(), AnimationTarget::SnapshotProxy);
    assert!(!host.is_content_visible());
    assert!(!host.has_content());
    assert!(
        log.overlay_events().contains(&OverlayEvent::ExitStarted {
            target: AnimationTarget::SnapshotProxy,
            size: Size::new(300, 200),
            pivot: Point::new(150.0, 200.0),
        }),
        "{:?}",
        log.overlay_events()
    );

    drive_until_released(&mut host, t, 20);
    assert_eq!(host.phase(), OverlayPhase::Released);
    assert!(!host.is_dismissing());
    assert!(host.snapshot().is_none());
    assert_eq!(provider.attached(), 0);
    assert_eq!(log.count(|e| *e == LogEntry::DismissCallback), 1);
}

#[test]
fn dismissal_steps_happen_in_order() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();
    let mut host = new_host(&mut provider, &parent, &log, "profile");
    let t = bring_up(&mut host, Size::new(300, 200));
    log.clear();

    send(&mut host, &outside_tap());
    host.dismiss();
    drive_until_released(&mut host, t, 20);

    let at = |pred: &dyn Fn(&LogEntry) -> bool| {
        log.position(pred)
            .unwrap_or_else(|| panic!("missing step in {:?}", log.entries()))
    };
    let steps = [
        at(&|e| *e == LogEntry::DismissCallback),
        at(&is_overlay(|e| matches!(e, OverlayEvent::SnapshotCaptured { .. }))),
        at(&is_overlay(|e| *e == OverlayEvent::ProxyInserted)),
        at(&|e| *e == LogEntry::ContentDisposed("profile".into())),
        at(&is_overlay(|e| matches!(e, OverlayEvent::ContentTornDown { .. }))),
        at(&is_overlay(|e| matches!(e, OverlayEvent::ExitStarted { .. }))),
        at(&is_overlay(is_exit_frame)),
        at(&is_overlay(|e| matches!(e, OverlayEvent::TransitionEnded { .. }))),
        at(&is_overlay(|e| matches!(e, OverlayEvent::SnapshotReleased { .. }))),
        at(&|e| *e == LogEntry::Window(WindowCall::Detach)),
        at(&is_overlay(|e| *e == OverlayEvent::WindowDetached)),
    ];
    assert!(
        steps.windows(2).all(|pair| pair[0] < pair[1]),
        "out of order: {steps:?} in {:?}",
        log.entries()
    );
}

#[test]
fn exit_transition_completes_after_full_duration() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();
    let mut host = new_host(&mut provider, &parent, &log, "profile");
    let t = bring_up(&mut host, Size::new(300, 200));

    host.dismiss();
    host.on_frame(t);
    assert!((host.current_frame().presence - 1.0).abs() < f32::EPSILON);
    host.on_frame(t + Duration::from_millis(149));
    assert_eq!(host.phase(), OverlayPhase::Exiting);
    host.on_frame(t + Duration::from_millis(150));
    assert_eq!(host.phase(), OverlayPhase::Released);

    let ended: Vec<_> = log
        .overlay_events()
        .into_iter()
        .filter_map(|e| match e {
            OverlayEvent::TransitionEnded { outcome }
                if outcome.direction == TransitionDirection::Exit =>
            {
                Some(outcome.end)
            }
            _ => None,
        })
        .collect();
    assert_eq!(ended, vec![TransitionEnd::Completed]);
}

#[test]
fn proxy_looks_like_live_content() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();
    let mut host = new_host(&mut provider, &parent, &log, "profile");
    bring_up(&mut host, Size::new(300, 200));
    let screen = DEFAULT_SCREEN.size();

    let live = surface_digest(&render_host(&host, screen));
    host.dismiss();
    assert!(host.snapshot().is_some());
    let proxied = surface_digest(&render_host(&host, screen));
    assert_eq!(live, proxied);
}

#[test]
fn late_layout_passes_do_not_move_the_exit_pivot() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();
    let mut host = new_host(&mut provider, &parent, &log, "profile");
    let t = bring_up(&mut host, Size::new(300, 200));
    let bounds = host.container_bounds();

    host.dismiss();
    host.on_layout(Size::ZERO);
    let mut now = t;
    while host.phase() == OverlayPhase::Exiting {
        assert_eq!(host.current_frame().transform.pivot, Point::new(150.0, 200.0));
        assert_eq!(host.container_bounds(), bounds);
        host.on_frame(now);
        host.on_layout(Size::new(0, 0));
        now += Duration::from_millis(16);
    }
    assert_eq!(host.phase(), OverlayPhase::Released);
    assert_eq!(
        log.count(is_overlay(|e| matches!(e, OverlayEvent::FirstLayout { .. }))),
        1
    );
}

// ============================================================================
// Empty content
// ============================================================================

#[test]
fn zero_height_sheet_animates_container_and_cleans_up() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();
    let mut host = new_host(&mut provider, &parent, &log, "empty");
    let t = bring_up(&mut host, Size::new(300, 0));

    host.handle_event(&Event::Back(BackEvent::Invoked));
    host.dismiss();
    assert_eq!(host.animation_target(), AnimationTarget::Content);
    assert!(host.snapshot().is_none());
    assert!(log.overlay_events().contains(&OverlayEvent::SnapshotSkipped));

    drive_until_released(&mut host, t, 20);
    assert_eq!(host.phase(), OverlayPhase::Released);
    assert_eq!(log.count(|e| *e == LogEntry::ContentDisposed("empty".into())), 1);
    assert!(log.overlay_events().contains(&OverlayEvent::WindowDetached));
    assert!(
        !log.overlay_events()
            .iter()
            .any(|e| matches!(e, OverlayEvent::SnapshotReleased { .. }))
    );
}

#[test]
fn childless_content_is_not_captured() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();
    let mut host = OverlayHost::new(
        &mut provider,
        &parent,
        OverlayProperties::default(),
        log.dismiss_callback(),
        |ctx| RecordingContent::new("blank", ctx, &log).childless().boxed(),
    )
    .expect("window available")
    .with_listener(log.listener());
    bring_up(&mut host, Size::new(300, 200));

    host.dismiss();
    assert_eq!(host.animation_target(), AnimationTarget::Content);
    assert!(log.overlay_events().contains(&OverlayEvent::SnapshotSkipped));
}

#[test]
fn capture_over_ceiling_falls_back_to_container() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();
    let mut host = new_host(&mut provider, &parent, &log, "huge")
        .with_config(SheetConfig::default().max_capture_pixels(100));
    let t = bring_up(&mut host, Size::new(300, 200));

    host.dismiss();
    assert_eq!(host.animation_target(), AnimationTarget::Content);
    assert!(
        log.overlay_events()
            .iter()
            .any(|e| matches!(e, OverlayEvent::SnapshotFailed { .. }))
    );
    drive_until_released(&mut host, t, 20);
    assert_eq!(provider.attached(), 0);
    assert_eq!(log.count(|e| *e == LogEntry::ContentDisposed("huge".into())), 1);
}

#[test]
fn config_defaults_seed_the_overlay() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();
    let config = SheetConfig::default()
        .snapshot_enabled(false)
        .default_properties(OverlayProperties::default().dismiss_on_outside_tap(false));

    let mut host = OverlayHost::from_config(
        &mut provider,
        &parent,
        config,
        log.dismiss_callback(),
        |ctx| RecordingContent::new("seeded", ctx, &log).boxed(),
    )
    .expect("window available");
    assert_eq!(host.properties(), config.default_properties);
    bring_up(&mut host, Size::new(300, 200));

    send(&mut host, &outside_tap());
    assert_eq!(log.count(|e| *e == LogEntry::DismissCallback), 0);
    host.dismiss();
    assert_eq!(host.animation_target(), AnimationTarget::Content);
}

// ============================================================================
// Re-show while exiting
// ============================================================================

#[test]
fn reshow_during_exit_reuses_saved_key() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();

    let mut first = OverlayHost::new(
        &mut provider,
        &parent,
        OverlayProperties::default(),
        log.dismiss_callback(),
        |ctx| {
            RecordingContent::new("first", ctx, &log)
                .with_saved_state("profile-form")
                .expect("key free")
                .boxed()
        },
    )
    .expect("window available");
    let t = bring_up(&mut first, Size::new(300, 200));
    assert!(parent.saved_state().is_registered("profile-form"));

    let taken = RecordingContent::new("other", &parent, &log).with_saved_state("profile-form");
    assert!(matches!(taken, Err(ScopeError::DuplicateKey(_))));

    first.dismiss();
    assert_eq!(first.phase(), OverlayPhase::Exiting);
    assert!(!parent.saved_state().is_registered("profile-form"));

    let mut second = OverlayHost::new(
        &mut provider,
        &parent,
        OverlayProperties::default(),
        log.dismiss_callback(),
        |ctx| {
            RecordingContent::new("second", ctx, &log)
                .with_saved_state("profile-form")
                .expect("key released at teardown")
                .boxed()
        },
    )
    .expect("window available");
    assert_ne!(first.identity(), second.identity());
    second.show().expect("identity key is fresh");
    second.on_layout(Size::new(300, 200));
    assert_eq!(provider.attached(), 2);

    drive_until_released(&mut first, t, 20);
    assert_eq!(provider.attached(), 1);
    assert_eq!(second.phase(), OverlayPhase::Entering);
}

// ============================================================================
// Early release
// ============================================================================

#[test]
fn release_mid_exit_runs_same_cleanup() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();
    let mut host = new_host(&mut provider, &parent, &log, "profile");
    let t = bring_up(&mut host, Size::new(300, 200));

    host.dismiss();
    host.on_frame(t);
    host.on_frame(t + Duration::from_millis(50));
    host.release();

    assert_eq!(host.phase(), OverlayPhase::Released);
    assert!(host.snapshot().is_none());
    assert_eq!(provider.attached(), 0);
    assert!(log.overlay_events().iter().any(|e| matches!(
        e,
        OverlayEvent::TransitionEnded { outcome }
            if outcome.end == TransitionEnd::Cancelled
    )));
    assert!(
        log.overlay_events()
            .iter()
            .any(|e| matches!(e, OverlayEvent::SnapshotReleased { .. }))
    );
    assert_eq!(log.count(|e| *e == LogEntry::ContentDisposed("profile".into())), 1);
}

#[test]
fn dropping_a_shown_host_disposes_and_detaches() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();
    {
        let mut host = new_host(&mut provider, &parent, &log, "profile");
        bring_up(&mut host, Size::new(300, 200));
    }
    assert_eq!(provider.attached(), 0);
    assert_eq!(log.count(|e| *e == LogEntry::ContentDisposed("profile".into())), 1);
    assert_eq!(log.count(|e| *e == LogEntry::DismissCallback), 0);
}

#[test]
fn destroyed_parent_releases_when_driven_by_requests() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();
    let mut host = new_host(&mut provider, &parent, &log, "profile");
    host.show().expect("show");
    host.on_layout(Size::new(300, 200));
    let t = drive_while_animating(&mut host, Instant::now(), 20);
    assert_eq!(host.phase(), OverlayPhase::Shown);
    assert!(!host.wants_frame());

    parent.lifecycle().move_to(LifecycleState::Destroyed);
    drive_while_animating(&mut host, t, 20);

    assert_eq!(host.phase(), OverlayPhase::Released);
    assert!(!host.has_content());
    assert_eq!(provider.attached(), 0);
    assert_eq!(log.count(|e| *e == LogEntry::ContentDisposed("profile".into())), 1);
    let destroyed = log
        .position(is_overlay(|e| *e == OverlayEvent::ParentDestroyed))
        .expect("destroy observed");
    let detached = log
        .position(is_overlay(|e| *e == OverlayEvent::WindowDetached))
        .expect("window detached");
    assert!(destroyed < detached);
}

#[test]
fn destroyed_parent_releases_on_next_frame() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();
    let mut host = new_host(&mut provider, &parent, &log, "profile");
    let t = bring_up(&mut host, Size::new(300, 200));

    parent.lifecycle().move_to(LifecycleState::Destroyed);
    host.on_frame(t + Duration::from_millis(16));
    assert_eq!(host.phase(), OverlayPhase::Released);
    assert_eq!(provider.attached(), 0);
}

// ============================================================================
// Window configuration
// ============================================================================

#[test]
fn window_inherits_parent_secure_flag() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log).parent_secure(true);
    let parent = ContentContext::root();
    let mut host = new_host(&mut provider, &parent, &log, "profile");
    host.show().expect("show");

    let state = provider.window_state(0).expect("window created");
    assert!(state.attached);
    assert_eq!(state.secure, Some(true));
    assert_eq!(state.decor_fits_system_windows, Some(false));
    assert_eq!(state.ancestor_clipping_disabled, 1);
}

#[test]
fn back_keys_are_consumed_even_when_not_dismissing() {
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();
    let mut host = OverlayHost::new(
        &mut provider,
        &parent,
        OverlayProperties::default().dismiss_on_back_signal(false),
        log.dismiss_callback(),
        |ctx| RecordingContent::new("pinned", ctx, &log).boxed(),
    )
    .expect("window available");
    bring_up(&mut host, Size::new(300, 200));

    send(
        &mut host,
        &[
            Event::Back(BackEvent::Started),
            Event::Back(BackEvent::Invoked),
            Event::Key(KeyEvent::new(KeyCode::Escape)),
        ],
    );
    assert_eq!(log.count(|e| *e == LogEntry::DismissCallback), 0);
    assert_eq!(host.phase(), OverlayPhase::Shown);
}

// ============================================================================
// Interleavings
// ============================================================================

#[derive(Debug, Clone)]
enum Step {
    OutsideTap,
    BackInvoked,
    Escape,
    Dismiss,
    Frame(u64),
    FocusLost,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::OutsideTap),
        Just(Step::BackInvoked),
        Just(Step::Escape),
        Just(Step::Dismiss),
        (1u64..80).prop_map(Step::Frame),
        Just(Step::FocusLost),
    ]
}

proptest! {
    #[test]
    fn dismissal_is_single_and_ordered(steps in prop::collection::vec(step(), 0..40)) {
        let log = EventLog::new();
        let mut provider = FakeWindowProvider::new(&log);
        let parent = ContentContext::root();
        let mut host = new_host(&mut provider, &parent, &log, "sheet");
        let mut now = bring_up(&mut host, Size::new(300, 200));

        for step in &steps {
            match step {
                Step::OutsideTap => send(&mut host, &outside_tap()),
                Step::BackInvoked => send(&mut host, &[Event::Back(BackEvent::Invoked)]),
                Step::Escape => send(&mut host, &[Event::Key(KeyEvent::new(KeyCode::Escape))]),
                Step::Dismiss => host.dismiss(),
                Step::Frame(ms) => {
                    now += Duration::from_millis(*ms);
                    host.on_frame(now);
                }
                Step::FocusLost => send(&mut host, &[Event::Focus(false)]),
            }
        }
        host.release();

        prop_assert!(log.count(|e| *e == LogEntry::DismissCallback) <= 1);
        prop_assert_eq!(log.count(|e| *e == LogEntry::ContentDisposed("sheet".into())), 1);
        prop_assert_eq!(log.count(|e| *e == LogEntry::Window(WindowCall::Detach)), 1);
        prop_assert_eq!(provider.attached(), 0);

        if let Some(first_exit_frame) = log.position(is_overlay(is_exit_frame)) {
            let torn_down = log
                .position(is_overlay(|e| matches!(e, OverlayEvent::ContentTornDown { .. })))
                .expect("teardown logged");
            prop_assert!(torn_down < first_exit_frame);
        }
    }
}
