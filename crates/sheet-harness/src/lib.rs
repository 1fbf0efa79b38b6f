#![forbid(unsafe_code)]

//! Deterministic fakes for exercising sheetkit overlays without a
//! platform.
//!
//! - [`FakeWindowProvider`] / [`FakeWindow`]: an in-memory native window
//!   that records every call.
//! - [`RecordingContent`]: sheet content that paints a solid colour,
//!   optionally registers saved state, and records its disposal.
//! - [`EventLog`]: one shared, ordered log of overlay diagnostics, window
//!   calls, dismiss callbacks, and content events, for ordering assertions.
//! - [`BackStack`]: a minimal navigation stack driving a [`SceneCache`].
//! - [`surface_digest`]: a stable hash of a rendered surface.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use sheet_core::geometry::{Rect, Size};
use sheet_core::{Instant, LayoutDirection};
use sheet_nav::{NavEntry, SceneCache, SceneUpdate};
use sheet_render::{PackedRgba, Surface};
use sheet_runtime::ContentContext;
use sheet_widgets::{
    NativeWindow, OverlayEvent, OverlayHost, OverlayPhase, SheetContent, SystemBarAppearance,
    WindowProvider,
};

/// Screen used when a test does not pick one.
pub const DEFAULT_SCREEN: Rect = Rect::new(0, 0, 400, 800);

/// Frame interval used by [`drive_until_released`].
pub const FRAME: Duration = Duration::from_millis(16);

// ============================================================================
// Event log
// ============================================================================

/// A call made on a [`FakeWindow`].
#[derive(Debug, Clone, PartialEq)]
pub enum WindowCall {
    Attach,
    Detach,
    SetSecure(bool),
    SetDecorFitsSystemWindows(bool),
    SetLayoutDirection(LayoutDirection),
    SetSystemBarAppearance(SystemBarAppearance),
    DisableAncestorClipping,
}

/// One entry in an [`EventLog`].
#[derive(Debug, Clone, PartialEq)]
pub enum LogEntry {
    Overlay(OverlayEvent),
    Window(WindowCall),
    /// The owner's dismiss callback ran.
    DismissCallback,
    /// Content with this name was disposed.
    ContentDisposed(String),
}

/// Shared, append-only log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Rc<RefCell<Vec<LogEntry>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: LogEntry) {
        self.entries.borrow_mut().push(entry);
    }

    /// Everything logged so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.borrow().clone()
    }

    /// Only the overlay diagnostics.
    pub fn overlay_events(&self) -> Vec<OverlayEvent> {
        self.entries
            .borrow()
            .iter()
            .filter_map(|entry| match entry {
                LogEntry::Overlay(event) => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    /// Index of the first entry matching `pred`.
    pub fn position(&self, pred: impl Fn(&LogEntry) -> bool) -> Option<usize> {
        self.entries.borrow().iter().position(pred)
    }

    /// Number of entries matching `pred`.
    pub fn count(&self, pred: impl Fn(&LogEntry) -> bool) -> usize {
        self.entries.borrow().iter().filter(|entry| pred(entry)).count()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// A listener that forwards overlay diagnostics into this log.
    pub fn listener(&self) -> impl FnMut(&OverlayEvent) + 'static {
        let log = self.clone();
        move |event| log.push(LogEntry::Overlay(event.clone()))
    }

    /// A dismiss callback that records its invocations into this log.
    pub fn dismiss_callback(&self) -> impl FnMut() + 'static {
        let log = self.clone();
        move || log.push(LogEntry::DismissCallback)
    }
}

// ============================================================================
// Fake window
// ============================================================================

/// Observable state of a [`FakeWindow`].
#[derive(Debug, Clone, Default)]
pub struct FakeWindowState {
    pub attached: bool,
    pub secure: Option<bool>,
    pub decor_fits_system_windows: Option<bool>,
    pub layout_direction: Option<LayoutDirection>,
    pub system_bars: Option<SystemBarAppearance>,
    pub ancestor_clipping_disabled: u32,
    pub attach_count: u32,
    pub detach_count: u32,
}

/// In-memory [`NativeWindow`].
#[derive(Debug, Clone)]
pub struct FakeWindow {
    screen: Rect,
    parent_secure: bool,
    state: Rc<RefCell<FakeWindowState>>,
    log: EventLog,
}

impl FakeWindow {
    /// Snapshot of the window's state.
    pub fn state(&self) -> FakeWindowState {
        self.state.borrow().clone()
    }

    fn record(&self, call: WindowCall) {
        self.log.push(LogEntry::Window(call));
    }
}

impl NativeWindow for FakeWindow {
    fn screen_bounds(&self) -> Rect {
        self.screen
    }

    fn attach(&mut self) {
        {
            let mut state = self.state.borrow_mut();
            state.attached = true;
            state.attach_count += 1;
        }
        self.record(WindowCall::Attach);
    }

    fn detach(&mut self) {
        {
            let mut state = self.state.borrow_mut();
            state.attached = false;
            state.detach_count += 1;
        }
        self.record(WindowCall::Detach);
    }

    fn is_attached(&self) -> bool {
        self.state.borrow().attached
    }

    fn parent_secure(&self) -> bool {
        self.parent_secure
    }

    fn set_secure(&mut self, secure: bool) {
        self.state.borrow_mut().secure = Some(secure);
        self.record(WindowCall::SetSecure(secure));
    }

    fn set_decor_fits_system_windows(&mut self, fits: bool) {
        self.state.borrow_mut().decor_fits_system_windows = Some(fits);
        self.record(WindowCall::SetDecorFitsSystemWindows(fits));
    }

    fn set_layout_direction(&mut self, direction: LayoutDirection) {
        self.state.borrow_mut().layout_direction = Some(direction);
        self.record(WindowCall::SetLayoutDirection(direction));
    }

    fn set_system_bar_appearance(&mut self, appearance: SystemBarAppearance) {
        self.state.borrow_mut().system_bars = Some(appearance);
        self.record(WindowCall::SetSystemBarAppearance(appearance));
    }

    fn disable_ancestor_clipping(&mut self) {
        self.state.borrow_mut().ancestor_clipping_disabled += 1;
        self.record(WindowCall::DisableAncestorClipping);
    }
}

/// Hands out [`FakeWindow`]s that share one log.
#[derive(Debug, Clone)]
pub struct FakeWindowProvider {
    screen: Rect,
    parent_secure: bool,
    available: bool,
    log: EventLog,
    windows: Vec<Rc<RefCell<FakeWindowState>>>,
}

impl FakeWindowProvider {
    pub fn new(log: &EventLog) -> Self {
        Self {
            screen: DEFAULT_SCREEN,
            parent_secure: false,
            available: true,
            log: log.clone(),
            windows: Vec::new(),
        }
    }

    #[must_use]
    pub fn screen(mut self, screen: Rect) -> Self {
        self.screen = screen;
        self
    }

    #[must_use]
    pub fn parent_secure(mut self, secure: bool) -> Self {
        self.parent_secure = secure;
        self
    }

    /// A provider that has no window to give.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// State of the `index`-th window handed out.
    pub fn window_state(&self, index: usize) -> Option<FakeWindowState> {
        self.windows.get(index).map(|state| state.borrow().clone())
    }

    /// Number of windows handed out.
    pub fn created(&self) -> usize {
        self.windows.len()
    }

    /// Number of handed-out windows still attached.
    pub fn attached(&self) -> usize {
        self.windows
            .iter()
            .filter(|state| state.borrow().attached)
            .count()
    }
}

impl WindowProvider for FakeWindowProvider {
    type Window = FakeWindow;

    fn create_window(&mut self) -> Option<FakeWindow> {
        if !self.available {
            return None;
        }
        let state = Rc::new(RefCell::new(FakeWindowState::default()));
        self.windows.push(Rc::clone(&state));
        Some(FakeWindow {
            screen: self.screen,
            parent_secure: self.parent_secure,
            state,
            log: self.log.clone(),
        })
    }
}

// ============================================================================
// Content
// ============================================================================

/// Solid-colour content that records its disposal.
#[derive(Debug)]
pub struct RecordingContent {
    name: String,
    color: PackedRgba,
    has_children: bool,
    saved_key: Option<String>,
    context: ContentContext,
    log: EventLog,
}

impl RecordingContent {
    pub fn new(name: impl Into<String>, context: &ContentContext, log: &EventLog) -> Self {
        Self {
            name: name.into(),
            color: PackedRgba::rgb(0x33, 0x66, 0x99),
            has_children: true,
            saved_key: None,
            context: context.clone(),
            log: log.clone(),
        }
    }

    #[must_use]
    pub fn color(mut self, color: PackedRgba) -> Self {
        self.color = color;
        self
    }

    /// Content that reports nothing rendered.
    #[must_use]
    pub fn childless(mut self) -> Self {
        self.has_children = false;
        self
    }

    /// Register saved state under `key`, released on dispose.
    ///
    /// Fails the same way a real screen would if the key is still held.
    pub fn with_saved_state(mut self, key: &str) -> Result<Self, sheet_runtime::ScopeError> {
        let name = self.name.clone();
        self.context.register_saved(key, move || name.clone())?;
        self.saved_key = Some(key.to_owned());
        Ok(self)
    }

    /// Boxed, ready to hand to [`OverlayHost::new`].
    pub fn boxed(self) -> Box<dyn SheetContent> {
        Box::new(self)
    }
}

impl SheetContent for RecordingContent {
    fn render(&self, surface: &mut Surface) {
        if self.has_children {
            let area = surface.bounds();
            surface.fill(area, self.color);
        }
    }

    fn has_rendered_children(&self) -> bool {
        self.has_children
    }

    fn dispose(&mut self) {
        if let Some(key) = self.saved_key.take() {
            self.context.saved_state().unregister(&key);
        }
        tracing::trace!(name = %self.name, "recording content disposed");
        self.log.push(LogEntry::ContentDisposed(self.name.clone()));
    }
}

// ============================================================================
// Driving
// ============================================================================

/// Feed frames every [`FRAME`] from `start` until the host is released or
/// `max_frames` is reached. Returns the time of the last frame.
pub fn drive_until_released<W: NativeWindow>(
    host: &mut OverlayHost<W>,
    start: Instant,
    max_frames: usize,
) -> Instant {
    let mut now = start;
    for _ in 0..max_frames {
        if host.phase() == OverlayPhase::Released {
            break;
        }
        host.on_frame(now);
        now += FRAME;
    }
    now
}

/// Feed frames every [`FRAME`] while the host asks for them.
pub fn drive_while_animating<W: NativeWindow>(
    host: &mut OverlayHost<W>,
    start: Instant,
    max_frames: usize,
) -> Instant {
    let mut now = start;
    for _ in 0..max_frames {
        if !host.wants_frame() {
            break;
        }
        host.on_frame(now);
        now += FRAME;
    }
    now
}

/// Render the host onto a fresh surface the size of `screen`.
pub fn render_host<W: NativeWindow>(host: &OverlayHost<W>, screen: Size) -> Surface {
    let mut surface = Surface::new(screen.width, screen.height);
    host.render(&mut surface);
    surface
}

/// Stable hex digest of a surface's size and pixels.
pub fn surface_digest(surface: &Surface) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&surface.width().to_le_bytes());
    hasher.update(&surface.height().to_le_bytes());
    for pixel in surface.pixels() {
        hasher.update(&pixel.0.to_be_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

// ============================================================================
// Navigation
// ============================================================================

/// A minimal back stack feeding a [`SceneCache`].
#[derive(Debug)]
pub struct BackStack<K> {
    entries: Vec<NavEntry<K>>,
    cache: SceneCache<K>,
}

impl<K: Clone + PartialEq + core::fmt::Debug + 'static> BackStack<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cache: SceneCache::default(),
        }
    }

    pub fn push(&mut self, entry: NavEntry<K>) -> SceneUpdate {
        self.entries.push(entry);
        self.cache.update(&self.entries)
    }

    pub fn pop(&mut self) -> (Option<NavEntry<K>>, SceneUpdate) {
        let popped = self.entries.pop();
        let update = self.cache.update(&self.entries);
        (popped, update)
    }

    pub fn entries(&self) -> &[NavEntry<K>] {
        &self.entries
    }

    pub fn scene_cache(&self) -> &SceneCache<K> {
        &self.cache
    }
}

impl<K: Clone + PartialEq + core::fmt::Debug + 'static> Default for BackStack<K> {
    fn default() -> Self {
        Self::new()
    }
}
