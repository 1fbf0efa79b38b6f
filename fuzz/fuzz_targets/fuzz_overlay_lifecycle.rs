#![no_main]

use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sheet_core::event::{BackEvent, Event, KeyCode, KeyEvent, PointerEvent, PointerEventKind};
use sheet_core::geometry::Size;
use sheet_core::{Instant, OverlayProperties};
use sheet_harness::{EventLog, FakeWindowProvider, LogEntry, RecordingContent, WindowCall};
use sheet_runtime::ContentContext;
use sheet_widgets::{OverlayEvent, OverlayHost, TransitionDirection};

#[derive(Debug, Arbitrary)]
enum Op {
    Show,
    Layout { width: u16, height: u16 },
    Frame { millis: u8 },
    Pointer { down: bool, x: u16, y: u16 },
    BackInvoked,
    BackProgress,
    Escape,
    FocusLost,
    Dismiss,
    Release,
}

#[derive(Debug, Arbitrary)]
struct Input {
    dismiss_on_back: bool,
    dismiss_on_outside_tap: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    if input.ops.len() > 256 {
        return;
    }
    let log = EventLog::new();
    let mut provider = FakeWindowProvider::new(&log);
    let parent = ContentContext::root();
    let properties = OverlayProperties::default()
        .dismiss_on_back_signal(input.dismiss_on_back)
        .dismiss_on_outside_tap(input.dismiss_on_outside_tap);
    let Ok(host) = OverlayHost::new(
        &mut provider,
        &parent,
        properties,
        log.dismiss_callback(),
        |ctx| RecordingContent::new("fuzz", ctx, &log).boxed(),
    ) else {
        return;
    };
    let mut host = host.with_listener(log.listener());

    let mut now = Instant::now();
    for op in &input.ops {
        match *op {
            Op::Show => {
                let _ = host.show();
            }
            Op::Layout { width, height } => {
                host.on_layout(Size::new(u32::from(width % 1024), u32::from(height % 1024)));
            }
            Op::Frame { millis } => {
                now += Duration::from_millis(u64::from(millis));
                host.on_frame(now);
            }
            Op::Pointer { down, x, y } => {
                let kind = if down {
                    PointerEventKind::Down
                } else {
                    PointerEventKind::Up
                };
                host.handle_event(&Event::Pointer(PointerEvent::new(
                    kind,
                    f32::from(x % 512),
                    f32::from(y % 1024),
                )));
            }
            Op::BackInvoked => {
                host.handle_event(&Event::Back(BackEvent::Invoked));
            }
            Op::BackProgress => {
                host.handle_event(&Event::Back(BackEvent::Progressed(0.5)));
            }
            Op::Escape => {
                host.handle_event(&Event::Key(KeyEvent::new(KeyCode::Escape)));
            }
            Op::FocusLost => {
                host.handle_event(&Event::Focus(false));
            }
            Op::Dismiss => host.dismiss(),
            Op::Release => host.release(),
        }
    }
    drop(host);

    assert!(log.count(|e| *e == LogEntry::DismissCallback) <= 1);
    assert_eq!(log.count(|e| *e == LogEntry::ContentDisposed("fuzz".into())), 1);
    assert_eq!(
        log.count(|e| *e == LogEntry::Window(WindowCall::Attach)),
        log.count(|e| *e == LogEntry::Window(WindowCall::Detach))
    );
    assert_eq!(provider.attached(), 0);

    let exit_frame = log.position(|e| {
        matches!(
            e,
            LogEntry::Overlay(OverlayEvent::FrameCommitted {
                direction: TransitionDirection::Exit,
                ..
            })
        )
    });
    if let Some(exit_frame) = exit_frame {
        let torn_down = log.position(|e| {
            matches!(e, LogEntry::Overlay(OverlayEvent::ContentTornDown { .. }))
        });
        assert!(torn_down.is_some_and(|at| at < exit_frame));
    }
});
