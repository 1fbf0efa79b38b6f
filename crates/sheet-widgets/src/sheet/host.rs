#![forbid(unsafe_code)]

//! The overlay host: one bottom-sheet presentation in its own window.
//!
//! [`OverlayHost`] owns the native window, the content container, the
//! dismiss arbiter, the snapshot, and the transition animator of a single
//! show-request, and sequences them:
//!
//! ```text
//! new ─► show ─► first layout ─► enter ─► shown
//!                                           │ dismiss
//!                                           ▼
//!   capture ─► hide content + insert proxy ─► teardown ─► exit ─► release
//! ```
//!
//! # Invariants
//!
//! 1. **Teardown before animation**: content is disposed and its identity
//!    unregistered inside [`OverlayHost::dismiss`], before the exit
//!    transition's first frame can be committed by [`OverlayHost::on_frame`].
//! 2. **Release after animation**: the window is detached and the snapshot
//!    dropped only from the exit transition's terminal outcome, whether it
//!    completed or was cancelled.
//! 3. **Single dismissal**: the dismiss callback runs at most once until the
//!    exit transition ends.
//! 4. **Stable dimensions**: the exit transition's pivot comes from the size
//!    recorded at capture, never from a later layout.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Provider has no window | `new` fails with [`OverlayError::MissingWindow`] |
//! | Identity already registered | `show` fails with [`OverlayError::Scope`] |
//! | Capture fails or is skipped | Logged; the live container is animated out |
//! | Host dropped mid-exit | Exit cancelled; same cleanup as completion |
//! | Parent lifecycle destroyed | A frame is requested; it releases the overlay |

use core::fmt;
use std::cell::Cell;
use std::rc::Rc;

use sheet_core::event::{BackEvent, Event, KeyCode, KeyEvent};
use sheet_core::geometry::{Point, Rect, Size};
use sheet_core::{Instant, LayoutDirection, OverlayProperties, StateIdentity};
use sheet_render::Surface;
use sheet_runtime::{
    ContentContext, FrameClock, LifecycleObservation, LifecycleState, SheetConfig,
};

use super::animation::{
    AnimationTarget, TransitionAnimator, TransitionDirection, TransitionEnd, TransitionFrame,
    TransitionOutcome,
};
use super::arbiter::{DismissArbiter, DismissSource};
use super::container::{ContentContainer, OutsideTapTracker, TapClass};
use super::diagnostics::{OverlayEvent, OverlayListener};
use super::error::OverlayError;
use super::snapshot::{ContentRegion, SnapshotCapturer, VisualSnapshot};
use super::window::{NativeWindow, SystemBarAppearance, WindowProvider};
use crate::SheetContent;

/// Where an overlay is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayPhase {
    /// Constructed; window not attached.
    Created,
    /// Window attached; waiting for the content's first measurement.
    AwaitingLayout,
    Entering,
    Shown,
    Exiting,
    /// Window detached and every resource dropped.
    Released,
}

impl OverlayPhase {
    /// Whether the overlay window is on screen.
    #[inline]
    pub fn is_on_screen(self) -> bool {
        matches!(
            self,
            Self::AwaitingLayout | Self::Entering | Self::Shown | Self::Exiting
        )
    }
}

/// Whether the host kept an input event for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    Consumed,
    /// The event belongs to the sheet's content.
    Ignored,
}

/// One bottom-sheet presentation.
pub struct OverlayHost<W: NativeWindow> {
    window: W,
    context: ContentContext,
    identity: StateIdentity,
    identity_registered: bool,
    properties: OverlayProperties,
    layout_direction: LayoutDirection,
    on_dismiss: Box<dyn FnMut()>,
    content: Option<Box<dyn SheetContent>>,
    torn_down: bool,
    container: ContentContainer,
    taps: OutsideTapTracker,
    arbiter: DismissArbiter,
    config: SheetConfig,
    capturer: SnapshotCapturer,
    snapshot: Option<VisualSnapshot>,
    animator: TransitionAnimator,
    clock: FrameClock,
    clipping_disabled: bool,
    parent_destroyed: Rc<Cell<bool>>,
    parent_observation: Option<LifecycleObservation>,
    phase: OverlayPhase,
    listener: Option<OverlayListener>,
}

impl<W: NativeWindow> fmt::Debug for OverlayHost<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayHost")
            .field("identity", &self.identity)
            .field("phase", &self.phase)
            .field("dismissing", &self.arbiter.is_dismissing())
            .field("properties", &self.properties)
            .field("container", &self.container)
            .field("has_snapshot", &self.snapshot.is_some())
            .finish()
    }
}

impl<W: NativeWindow> OverlayHost<W> {
    /// Create an overlay for one show-request.
    ///
    /// A fresh [`StateIdentity`] is generated, the content is built against
    /// a context derived from `parent` that carries it, and a window is
    /// taken from `provider`. Nothing is on screen until [`show`](Self::show).
    pub fn new<P, F>(
        provider: &mut P,
        parent: &ContentContext,
        properties: OverlayProperties,
        on_dismiss: impl FnMut() + 'static,
        content: F,
    ) -> Result<Self, OverlayError>
    where
        P: WindowProvider<Window = W>,
        F: FnOnce(&ContentContext) -> Box<dyn SheetContent>,
    {
        let window = provider.create_window().ok_or(OverlayError::MissingWindow)?;
        let identity = StateIdentity::next();
        let context = parent.for_overlay(identity);
        let content = content(&context);
        let config = SheetConfig::default();

        tracing::debug!(%identity, "overlay created");

        Ok(Self {
            window,
            layout_direction: context.layout_direction(),
            context,
            identity,
            identity_registered: false,
            properties,
            on_dismiss: Box::new(on_dismiss),
            content: Some(content),
            torn_down: false,
            container: ContentContainer::new(),
            taps: OutsideTapTracker::new(),
            arbiter: DismissArbiter::new(),
            capturer: SnapshotCapturer::from_config(&config),
            snapshot: None,
            animator: TransitionAnimator::new(config.scrim),
            config,
            clock: FrameClock::new(),
            clipping_disabled: false,
            parent_destroyed: Rc::new(Cell::new(false)),
            parent_observation: None,
            phase: OverlayPhase::Created,
            listener: None,
        })
    }

    /// Create an overlay whose properties are `config.default_properties`
    /// and whose scrim and capture settings come from `config`.
    pub fn from_config<P, F>(
        provider: &mut P,
        parent: &ContentContext,
        config: SheetConfig,
        on_dismiss: impl FnMut() + 'static,
        content: F,
    ) -> Result<Self, OverlayError>
    where
        P: WindowProvider<Window = W>,
        F: FnOnce(&ContentContext) -> Box<dyn SheetContent>,
    {
        let host = Self::new(provider, parent, config.default_properties, on_dismiss, content)?;
        Ok(host.with_config(config))
    }

    /// Use `config` for scrim colour and snapshot capture.
    ///
    /// Takes effect for transitions started afterwards.
    #[must_use]
    pub fn with_config(mut self, config: SheetConfig) -> Self {
        self.capturer = SnapshotCapturer::from_config(&config);
        if !self.animator.is_running() {
            self.animator = TransitionAnimator::new(config.scrim);
        }
        self.config = config;
        self
    }

    /// Report lifecycle steps to `listener`.
    #[must_use]
    pub fn with_listener(mut self, listener: impl FnMut(&OverlayEvent) + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    // ========================================================================
    // Show
    // ========================================================================

    /// Attach the window and insert the content container.
    ///
    /// The enter transition waits for [`on_layout`](Self::on_layout). Calling
    /// `show` on an overlay that is already on screen does nothing.
    pub fn show(&mut self) -> Result<(), OverlayError> {
        match self.phase {
            OverlayPhase::Created => {}
            OverlayPhase::Released => return Err(OverlayError::AlreadyReleased),
            _ => return Ok(()),
        }

        let id = self.identity.id();
        self.context
            .register_saved(&self.identity.registry_key(), move || id.to_string())?;
        self.identity_registered = true;

        let destroyed = Rc::clone(&self.parent_destroyed);
        self.parent_observation = Some(self.context.lifecycle().observe(move |state| {
            if state == LifecycleState::Destroyed {
                destroyed.set(true);
            }
        }));

        self.window.attach();
        self.emit(OverlayEvent::WindowAttached);
        self.apply_window_config();

        self.container = ContentContainer::new();
        if !self.clipping_disabled {
            self.window.disable_ancestor_clipping();
            self.clipping_disabled = true;
        }
        self.phase = OverlayPhase::AwaitingLayout;
        tracing::debug!(identity = %self.identity, "overlay shown");
        Ok(())
    }

    /// Replace the dismiss callback, properties, and layout direction.
    ///
    /// Called on every re-render. Window flags are re-applied only when
    /// something changed; transitions and the window are left alone.
    pub fn update_parameters(
        &mut self,
        on_dismiss: impl FnMut() + 'static,
        properties: OverlayProperties,
        layout_direction: LayoutDirection,
    ) {
        self.on_dismiss = Box::new(on_dismiss);
        if self.phase == OverlayPhase::Released {
            return;
        }
        let changed =
            properties != self.properties || layout_direction != self.layout_direction;
        self.properties = properties;
        self.layout_direction = layout_direction;
        if changed && self.window.is_attached() {
            self.apply_window_config();
        }
    }

    fn apply_window_config(&mut self) {
        let secure = self
            .properties
            .secure_policy
            .resolve(self.window.parent_secure());
        let edge_to_edge = self.properties.edge_to_edge_content_enabled;
        self.window.set_secure(secure);
        self.window.set_decor_fits_system_windows(!edge_to_edge);
        self.window.set_layout_direction(self.layout_direction);
        self.window
            .set_system_bar_appearance(SystemBarAppearance::for_scrim(self.config.scrim));
        self.emit(OverlayEvent::WindowConfigured {
            secure,
            edge_to_edge,
        });
    }

    /// Feed a layout pass with the content's measured size.
    ///
    /// The first pass after [`show`](Self::show) starts the enter transition.
    /// Passes during the exit are ignored: the exit keeps the dimensions it
    /// started with.
    pub fn on_layout(&mut self, content_size: Size) {
        match self.phase {
            OverlayPhase::AwaitingLayout => {
                self.container
                    .layout(self.window.screen_bounds(), content_size);
                self.emit(OverlayEvent::FirstLayout { size: content_size });

                if let Some(outcome) = self
                    .animator
                    .play_enter(AnimationTarget::Content, content_size)
                {
                    self.on_transition_end(outcome);
                }
                self.phase = OverlayPhase::Entering;
                self.clock.request();

                let pivot = self.animator.pivot();
                tracing::debug!(
                    identity = %self.identity,
                    width = content_size.width,
                    height = content_size.height,
                    "enter transition started"
                );
                self.emit(OverlayEvent::EnterStarted {
                    size: content_size,
                    pivot,
                });
            }
            OverlayPhase::Entering | OverlayPhase::Shown => {
                self.container
                    .layout(self.window.screen_bounds(), content_size);
                self.animator.resize_content(content_size);
            }
            OverlayPhase::Created | OverlayPhase::Exiting | OverlayPhase::Released => {}
        }
    }

    // ========================================================================
    // Frames
    // ========================================================================

    /// Advance the active transition to `now` and commit its frame.
    pub fn on_frame(&mut self, now: Instant) {
        if self.phase == OverlayPhase::Released {
            return;
        }
        if self.parent_destroyed.get() || self.context.lifecycle().is_destroyed() {
            tracing::debug!(identity = %self.identity, "parent destroyed, releasing overlay");
            self.emit(OverlayEvent::ParentDestroyed);
            self.release();
            return;
        }

        let info = self.clock.begin_frame(now);
        let Some(direction) = self.animator.direction() else {
            return;
        };
        let finished = self.animator.tick(now);
        self.emit(OverlayEvent::FrameCommitted {
            direction,
            target: self.animator.target(),
            presence: self.animator.presence(),
            frame: info.frame,
            delta: info.delta,
        });
        match finished {
            Some(outcome) => self.on_transition_end(outcome),
            None => self.clock.request(),
        }
    }

    /// Whether the host needs another frame.
    ///
    /// Also true once the parent lifecycle is destroyed, so a driver that
    /// only feeds requested frames still releases the overlay.
    pub fn wants_frame(&self) -> bool {
        if self.phase == OverlayPhase::Released {
            return false;
        }
        self.clock.is_requested() || self.parent_destroyed.get()
    }

    fn on_transition_end(&mut self, outcome: TransitionOutcome) {
        tracing::debug!(
            identity = %self.identity,
            direction = ?outcome.direction,
            end = ?outcome.end,
            "transition ended"
        );
        self.emit(OverlayEvent::TransitionEnded { outcome });
        match outcome.direction {
            TransitionDirection::Enter => {
                if outcome.end == TransitionEnd::Completed && self.phase == OverlayPhase::Entering
                {
                    self.phase = OverlayPhase::Shown;
                }
            }
            TransitionDirection::Exit => self.finish_exit(),
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Route an input event.
    ///
    /// Back gestures are always consumed so no outside back animation can
    /// race the exit transition. Only a committed back gesture, a back key
    /// press, or an Escape press is a dismiss signal.
    pub fn handle_event(&mut self, event: &Event) -> EventDisposition {
        if !self.phase.is_on_screen() {
            return EventDisposition::Ignored;
        }
        match event {
            Event::Back(BackEvent::Invoked) => {
                self.on_back_signal(DismissSource::BackSignal);
                EventDisposition::Consumed
            }
            Event::Back(_) => EventDisposition::Consumed,
            Event::Key(key) => self.handle_key(key),
            Event::Pointer(pointer) => {
                let class = self.taps.classify(pointer, self.container.bounds());
                if class == TapClass::OutsideTap && self.properties.dismiss_on_outside_tap {
                    self.request_dismiss(DismissSource::OutsideTap);
                }
                if class.is_outside() {
                    EventDisposition::Consumed
                } else {
                    EventDisposition::Ignored
                }
            }
            Event::Focus(gained) => {
                if !gained {
                    self.taps.reset();
                    self.cancel();
                }
                EventDisposition::Ignored
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> EventDisposition {
        let source = match key.code {
            KeyCode::Back => DismissSource::BackSignal,
            KeyCode::Escape => DismissSource::EscapeKey,
            _ => return EventDisposition::Ignored,
        };
        if key.is_press() {
            self.on_back_signal(source);
        }
        EventDisposition::Consumed
    }

    fn on_back_signal(&mut self, source: DismissSource) {
        if self.properties.dismiss_on_back_signal {
            self.request_dismiss(source);
        }
    }

    fn request_dismiss(&mut self, source: DismissSource) {
        if self.arbiter.try_begin(source) {
            tracing::debug!(identity = %self.identity, %source, "dismiss forwarded");
            self.emit(OverlayEvent::DismissForwarded { source });
            (self.on_dismiss)();
        } else {
            tracing::debug!(identity = %self.identity, %source, "dismiss suppressed");
            self.emit(OverlayEvent::DismissSuppressed { source });
        }
    }

    /// Implicit system cancellation. Deliberately does nothing: only
    /// [`dismiss`](Self::dismiss) runs teardown before the exit transition.
    pub fn cancel(&self) {
        tracing::trace!(identity = %self.identity, "implicit cancel ignored");
    }

    // ========================================================================
    // Dismissal
    // ========================================================================

    /// Tear down the content and play the exit transition.
    ///
    /// The window is released when the transition ends. Calling this while
    /// an exit is already running does nothing.
    pub fn dismiss(&mut self) {
        match self.phase {
            OverlayPhase::Exiting | OverlayPhase::Released => return,
            OverlayPhase::Created => {
                self.release();
                return;
            }
            OverlayPhase::AwaitingLayout | OverlayPhase::Entering | OverlayPhase::Shown => {}
        }
        self.arbiter.mark_dismissing();

        let target = self.capture_and_teardown();
        let size = self
            .snapshot
            .as_ref()
            .map_or(self.container.measured(), VisualSnapshot::size);

        self.phase = OverlayPhase::Exiting;
        if let Some(cancelled) = self.animator.play_exit(target, size) {
            self.on_transition_end(cancelled);
        }
        self.clock.request();

        let pivot = self.animator.pivot();
        tracing::debug!(identity = %self.identity, ?target, "exit transition started");
        self.emit(OverlayEvent::ExitStarted {
            target,
            size,
            pivot,
        });
    }

    /// Freeze the content's appearance, swap in the proxy, and tear the
    /// content down. Returns what the exit transition should animate.
    fn capture_and_teardown(&mut self) -> AnimationTarget {
        let region = ContentRegion::new(self.container.measured(), self.content.as_deref());
        let captured = self.capturer.capture(&region);

        let target = match captured {
            Ok(Some(snapshot)) => {
                let size = snapshot.size();
                tracing::debug!(
                    identity = %self.identity,
                    width = size.width,
                    height = size.height,
                    "snapshot captured"
                );
                self.emit(OverlayEvent::SnapshotCaptured { size });
                self.container.hide_content();
                self.snapshot = Some(snapshot);
                self.emit(OverlayEvent::ProxyInserted);
                AnimationTarget::SnapshotProxy
            }
            Ok(None) => {
                tracing::debug!(
                    identity = %self.identity,
                    "nothing to capture, animating container"
                );
                self.emit(OverlayEvent::SnapshotSkipped);
                AnimationTarget::Content
            }
            Err(error) => {
                tracing::warn!(identity = %self.identity, %error, "snapshot capture failed");
                self.emit(OverlayEvent::SnapshotFailed { error });
                AnimationTarget::Content
            }
        };

        self.teardown_content();
        target
    }

    fn teardown_content(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(mut content) = self.content.take() {
            content.dispose();
        }
        if self.identity_registered {
            self.context
                .saved_state()
                .unregister(&self.identity.registry_key());
            self.identity_registered = false;
        }
        tracing::debug!(identity = %self.identity, "content torn down");
        self.emit(OverlayEvent::ContentTornDown {
            identity: self.identity,
        });
    }

    /// Cleanup shared by exit completion and exit cancellation.
    fn finish_exit(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            let bytes = snapshot.byte_len();
            drop(snapshot);
            self.emit(OverlayEvent::SnapshotReleased { bytes });
        }
        if self.window.is_attached() {
            self.window.detach();
            tracing::debug!(identity = %self.identity, "window detached");
            self.emit(OverlayEvent::WindowDetached);
        }
        self.arbiter.reset();
        self.parent_observation = None;
        self.clock.cancel_request();
        self.phase = OverlayPhase::Released;
    }

    /// Release everything now, cancelling any transition in flight.
    ///
    /// Used when the owning screen goes away. Runs the same cleanup as a
    /// completed exit. Also called on drop.
    pub fn release(&mut self) {
        if self.phase == OverlayPhase::Released {
            return;
        }
        if let Some(outcome) = self.animator.cancel() {
            self.on_transition_end(outcome);
        }
        if self.phase != OverlayPhase::Released {
            self.teardown_content();
            self.finish_exit();
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Paint the scrim over the whole window, then the active target.
    pub fn render(&self, surface: &mut Surface) {
        if !self.phase.is_on_screen() || !self.window.is_attached() {
            return;
        }
        let frame = self.animator.frame();
        let screen = surface.bounds();
        surface.blend_fill(screen, frame.scrim);

        let bounds = self.container.bounds();
        let origin = Point::new(bounds.x as f32, bounds.y as f32);
        if let Some(snapshot) = &self.snapshot {
            surface.draw_layer(snapshot.raster(), origin, frame.transform);
        } else if self.container.is_visible()
            && let Some(content) = &self.content
        {
            let size = self.container.measured();
            if size.is_empty() {
                return;
            }
            let mut layer = Surface::new(size.width, size.height);
            content.render(&mut layer);
            surface.draw_layer(&layer, origin, frame.transform);
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    /// Whether a dismissal is underway.
    pub fn is_dismissing(&self) -> bool {
        self.arbiter.is_dismissing()
    }

    pub fn identity(&self) -> StateIdentity {
        self.identity
    }

    /// The context handed to the content.
    pub fn context(&self) -> &ContentContext {
        &self.context
    }

    pub fn properties(&self) -> OverlayProperties {
        self.properties
    }

    pub fn layout_direction(&self) -> LayoutDirection {
        self.layout_direction
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    /// Content container bounds in window coordinates.
    pub fn container_bounds(&self) -> Rect {
        self.container.bounds()
    }

    /// Whether the live content is still painted.
    pub fn is_content_visible(&self) -> bool {
        self.container.is_visible()
    }

    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    pub fn snapshot(&self) -> Option<&VisualSnapshot> {
        self.snapshot.as_ref()
    }

    /// What the current or most recent transition animates.
    pub fn animation_target(&self) -> AnimationTarget {
        self.animator.target()
    }

    /// Values for the current frame.
    pub fn current_frame(&self) -> TransitionFrame {
        self.animator.frame()
    }

    fn emit(&mut self, event: OverlayEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&event);
        }
    }
}

impl<W: NativeWindow> Drop for OverlayHost<W> {
    fn drop(&mut self) {
        self.release();
    }
}
