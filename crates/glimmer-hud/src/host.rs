//! The overlay host: window, frame loop, and service orchestration.
//!
//! [`OverlayHost`] drives everything per frame: while the target game runs it
//! updates every service, repaints continuously, and accumulates draw lag for
//! the frame counter. While the game is absent it parks the window offscreen,
//! updates only the essential services, and degrades to a low-frequency poll:
//! 50 ms event-loop waits, re-running the essential cycle (which rescans the
//! process table) every 200 slices (~10 s). Game detection or a quit request
//! leaves the degraded cadence immediately.

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowId, WindowLevel};

use glimmer_core::{Application, EventLoopDriver, HudEvent, Tick};
use glimmer_render::{Color, DrawListRenderer, Point, Renderer, Size};
use glimmer_ui::{
    from_winit_key, from_winit_modifiers, AssignmentWindow, Control, ControlEvent, HotkeyAssigner,
    KeyPressEvent, KeyReleaseEvent, KeyboardModifiers, MouseState, Panel, Screen, SharedBinding,
};

use crate::process::GAME_STATE_CHANGED;
use crate::service::{FrameClock, HudContext, ServiceHost};
use crate::services::{
    DebugService, FrameCounter, GameIntegrationService, HotkeysService, SettingsService,
};

/// One wait slice of the degraded poll.
pub const POLL_SLICE: Duration = Duration::from_millis(50);

/// Wait slices between essential-service cycles while the game is absent
/// (200 x 50 ms, ~10 s).
pub const POLL_SLICES: u32 = 200;

/// Offscreen parking position while the game is absent (where Windows puts
/// minimized windows; keeps the surface from flashing on screen).
const PARKED_POSITION: (i32, i32) = (-32000, -32000);

/// Padding inside the hotkey settings panel.
const PANEL_PADDING: f32 = 8.0;

/// Counts down the degraded poll's wait slices.
///
/// [`advance`](Self::advance) returns `true` when a full cycle of slices has
/// elapsed and the essential services should run again.
#[derive(Debug)]
pub struct PollGate {
    remaining: u32,
}

impl PollGate {
    /// Start a fresh cycle.
    pub fn new() -> Self {
        Self {
            remaining: POLL_SLICES,
        }
    }

    /// Consume one wait slice; `true` means the cycle completed (and resets).
    pub fn advance(&mut self) -> bool {
        if self.remaining == 0 {
            self.remaining = POLL_SLICES;
            true
        } else {
            self.remaining -= 1;
            false
        }
    }

    /// Slices left in the current cycle.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl Default for PollGate {
    fn default() -> Self {
        Self::new()
    }
}

/// The overlay application host.
pub struct OverlayHost {
    context: HudContext,
    services: ServiceHost,
    screen: Screen,
    renderer: DrawListRenderer,
    mouse: MouseState,
    modifiers: KeyboardModifiers,
    clock: FrameClock,
    counter: Arc<FrameCounter>,

    window: Option<Window>,
    viewport: Size,
    /// Whether the window is parked offscreen.
    parked: bool,
    /// Lifecycle ran (resumed can fire more than once on some platforms).
    started: bool,

    /// Bindings whose assigner rows requested the assignment window.
    pending_assignments: Arc<Mutex<Vec<SharedBinding>>>,

    draw_lag: f32,
    skip_next_draw: bool,
    poll: Option<PollGate>,
}

impl OverlayHost {
    /// Create a host around an assembled service collection.
    pub fn new(context: HudContext, services: ServiceHost, counter: Arc<FrameCounter>) -> Self {
        let viewport = {
            let settings = context.settings.read();
            Size::new(settings.overlay_width as f32, settings.overlay_height as f32)
        };

        Self {
            screen: Screen::new(viewport),
            renderer: DrawListRenderer::new(viewport),
            mouse: MouseState::new(),
            modifiers: KeyboardModifiers::NONE,
            clock: FrameClock::start(),
            counter,
            window: None,
            viewport,
            parked: true,
            started: false,
            pending_assignments: Arc::new(Mutex::new(Vec::new())),
            draw_lag: 0.0,
            skip_next_draw: false,
            poll: None,
            context,
            services,
        }
    }

    /// Create a host with the standard service roster.
    ///
    /// Registration order is load order; unload runs reversed, so the
    /// hotkeys service writes bindings into the settings document before the
    /// settings service saves the file.
    pub fn with_default_services(settings_path: Option<PathBuf>) -> Self {
        let context = HudContext::new();
        let counter = Arc::new(FrameCounter::new());

        let mut services = ServiceHost::new();
        services.register(Box::new(DebugService::new(counter.clone())));
        services.register(Box::new(match settings_path {
            Some(path) => SettingsService::with_path(path),
            None => SettingsService::new(),
        }));
        services.register(Box::new(HotkeysService::new()));
        services.register(Box::new(GameIntegrationService::new()));

        Self::new(context, services, counter)
    }

    /// The shared context.
    pub fn context(&self) -> &HudContext {
        &self.context
    }

    /// The root of the control tree.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Whether the target game process is currently running.
    pub fn game_running(&self) -> bool {
        self.context.game_running.load(Ordering::SeqCst)
    }

    /// Drop the next draw instead of rendering it.
    ///
    /// Used when the present backend knows the upcoming frame would tear
    /// (e.g. mid-resize); one-shot, clears itself.
    pub fn skip_next_draw(&mut self) {
        self.skip_next_draw = true;
    }

    /// Unload all services. Call after the event loop returns.
    pub fn shutdown(&mut self) {
        self.services.unload_all(&self.context);
    }

    // =========================================================================
    // Frame loop
    // =========================================================================

    /// One host update. Returns the cadence the event loop should follow.
    pub fn run_update(&mut self) -> Tick {
        self.open_requested_assignments();

        if self.game_running() {
            if self.poll.take().is_some() || self.parked {
                self.unpark_window();
            }

            let tick = self.clock.tick();
            self.services.update_all(&self.context, &tick);
            self.draw_lag += tick.elapsed.as_secs_f32();

            if let Some(window) = &self.window {
                window.request_redraw();
            }
            return Tick::Redraw;
        }

        // The game is not running: park and poll at low frequency.
        let tick = self.clock.tick();
        match &mut self.poll {
            None => {
                self.park_window();
                self.services.update_essential(&self.context, &tick);
                self.poll = Some(PollGate::new());
            }
            Some(gate) => {
                if gate.advance() {
                    self.services.update_essential(&self.context, &tick);
                }
            }
        }
        Tick::Wait(POLL_SLICE)
    }

    /// Draw one frame.
    pub fn draw(&mut self) {
        if self.skip_next_draw {
            self.skip_next_draw = false;
            return;
        }

        self.counter.tick_frame(self.draw_lag);
        self.draw_lag = 0.0;

        if !self.game_running() {
            return;
        }

        self.renderer.begin_frame(Color::TRANSPARENT, self.viewport);
        self.screen.paint(self.renderer.list());
        let stats = self.renderer.end_frame();
        tracing::trace!(target: "glimmer_hud::host", commands = stats.commands, "frame drawn");
    }

    /// Frames drawn (skipped draws still count, matching the frame counter's
    /// role of measuring loop cadence rather than visible output).
    pub fn total_frames(&self) -> u64 {
        self.counter.total_frames()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Open assignment windows queued by assigner rows.
    fn open_requested_assignments(&mut self) {
        let pending: Vec<SharedBinding> = self.pending_assignments.lock().drain(..).collect();
        for binding in pending {
            self.screen
                .open_modal(Box::new(AssignmentWindow::new(binding)));
        }
    }

    fn park_window(&mut self) {
        if self.parked {
            return;
        }
        self.parked = true;
        if let Some(window) = &self.window {
            let (x, y) = PARKED_POSITION;
            window.set_outer_position(PhysicalPosition::new(x, y));
        }
    }

    fn unpark_window(&mut self) {
        if !self.parked {
            return;
        }
        self.parked = false;
        if let Some(window) = &self.window {
            window.set_outer_position(PhysicalPosition::new(0, 0));
        }
    }

    /// Build the overlay's control tree: a settings panel with one assigner
    /// row per registered binding.
    fn build_ui(&mut self) {
        let bindings = self.context.bindings.bindings();
        let row_height = 20.0;
        let mut panel = Panel::new(Size::new(
            280.0,
            bindings.len() as f32 * row_height + PANEL_PADDING * 2.0,
        ));
        panel.base_mut().set_pos(Point::new(24.0, 24.0));

        for (index, binding) in bindings.into_iter().enumerate() {
            let mut row = HotkeyAssigner::new(binding);
            row.base_mut().set_pos(Point::new(
                PANEL_PADDING,
                PANEL_PADDING + index as f32 * row_height,
            ));

            let pending = self.pending_assignments.clone();
            row.assignment_requested.connect(move |binding| {
                pending.lock().push(binding.clone());
            });

            panel.add_child(Box::new(row));
        }

        self.screen.add_child(Box::new(panel));
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) {
        let (width, height) = {
            let settings = self.context.settings.read();
            (settings.overlay_width, settings.overlay_height)
        };
        let (x, y) = PARKED_POSITION;

        let attributes = Window::default_attributes()
            .with_title("Glimmer")
            .with_inner_size(LogicalSize::new(width, height))
            .with_decorations(false)
            .with_transparent(true)
            .with_resizable(false)
            .with_window_level(WindowLevel::AlwaysOnTop)
            // Start parked: the surface must not flash on screen at launch.
            .with_position(PhysicalPosition::new(x, y));

        match event_loop.create_window(attributes) {
            Ok(window) => {
                self.viewport = Size::new(width as f32, height as f32);
                self.screen.set_size(self.viewport);
                self.renderer.set_viewport(self.viewport);
                self.window = Some(window);
            }
            Err(err) => {
                tracing::error!(target: "glimmer_hud::host", %err, "failed to create overlay window");
                if let Some(app) = Application::try_instance() {
                    app.quit();
                }
            }
        }
    }

    fn dispatch_key(&mut self, event: &winit::event::KeyEvent) {
        let key = from_winit_key(&event.logical_key);

        if event.state.is_pressed() {
            // While an assignment window records, hotkeys must not fire.
            if !self.screen.has_modal() {
                self.context.bindings.key_down(key);
            }
            let mut press = ControlEvent::KeyPress(KeyPressEvent::new(
                key,
                self.modifiers,
                event.repeat,
            ));
            self.screen.dispatch(&mut press);
        } else {
            self.context.bindings.key_up(key);
            let mut release =
                ControlEvent::KeyRelease(KeyReleaseEvent::new(key, self.modifiers));
            self.screen.dispatch(&mut release);
        }
    }
}

impl EventLoopDriver for OverlayHost {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        self.create_window(event_loop);
        if self.window.is_none() {
            return;
        }

        if let Err(err) = self.services.init_all(&self.context) {
            tracing::error!(target: "glimmer_hud::host", %err, "service initialization failed");
            if let Some(app) = Application::try_instance() {
                app.quit();
            }
            return;
        }
        self.services.load_all(&self.context);
        self.build_ui();
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: &WindowEvent,
    ) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let point = Point::new(position.x as f32, position.y as f32);
                let move_event = self.mouse.handle_cursor_moved(point);
                self.screen.dispatch(&mut ControlEvent::MouseMove(move_event));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(mut event) = self.mouse.handle_mouse_input(*state, *button) {
                    self.screen.dispatch(&mut event);
                }
            }
            WindowEvent::CursorEntered { .. } => {
                self.mouse.handle_cursor_entered();
            }
            WindowEvent::CursorLeft { .. } => {
                let leave = self.mouse.handle_cursor_left();
                self.screen.dispatch(&mut ControlEvent::Leave(leave));
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = from_winit_modifiers(modifiers);
                self.mouse.update_modifiers(self.modifiers);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.dispatch_key(event);
            }
            WindowEvent::Focused(false) => {
                // Key releases are lost while unfocused.
                self.context.bindings.release_all();
            }
            WindowEvent::Resized(size) => {
                self.viewport = Size::new(size.width as f32, size.height as f32);
                self.screen.set_size(self.viewport);
                self.renderer.set_viewport(self.viewport);
            }
            WindowEvent::RedrawRequested => {
                self.draw();
            }
            _ => {}
        }
    }

    fn hud_event(&mut self, _event_loop: &ActiveEventLoop, event: &HudEvent) {
        if let HudEvent::Custom { kind: GAME_STATE_CHANGED } = event {
            tracing::info!(
                target: "glimmer_hud::host",
                running = self.game_running(),
                "game state changed"
            );
        }
    }

    fn tick(&mut self, _event_loop: &ActiveEventLoop) -> Tick {
        self.run_update()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{Service, UpdateTick};
    use std::sync::atomic::AtomicUsize;

    struct CountingService {
        essential: bool,
        updates: Arc<AtomicUsize>,
    }

    impl Service for CountingService {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn essential(&self) -> bool {
            self.essential
        }

        fn update(&mut self, _ctx: &HudContext, _tick: &UpdateTick) {
            self.updates.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// A headless host: loaded services, no window.
    fn host_with_services(
        essential: bool,
    ) -> (OverlayHost, Arc<AtomicUsize>) {
        let updates = Arc::new(AtomicUsize::new(0));
        let context = HudContext::new();
        let mut services = ServiceHost::new();
        services.register(Box::new(CountingService {
            essential,
            updates: updates.clone(),
        }));
        services.init_all(&context).unwrap();
        services.load_all(&context);

        let host = OverlayHost::new(context, services, Arc::new(FrameCounter::new()));
        (host, updates)
    }

    #[test]
    fn poll_gate_runs_a_full_cycle_of_slices() {
        let mut gate = PollGate::new();
        for _ in 0..POLL_SLICES {
            assert!(!gate.advance());
        }
        assert!(gate.advance());
        // And the cycle restarts.
        assert_eq!(gate.remaining(), POLL_SLICES);
        assert!(!gate.advance());
    }

    #[test]
    fn absent_game_degrades_to_poll_cadence() {
        let (mut host, updates) = host_with_services(true);

        let tick = host.run_update();
        assert_eq!(tick, Tick::Wait(POLL_SLICE));
        // Entering the degraded cadence runs the essential cycle once.
        assert_eq!(updates.load(Ordering::SeqCst), 1);

        // Further slices wait without updating...
        for _ in 0..POLL_SLICES {
            assert_eq!(host.run_update(), Tick::Wait(POLL_SLICE));
        }
        // ...until the cycle completes and the essential services run again.
        host.run_update();
        assert_eq!(updates.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn degraded_cadence_skips_non_essential_services() {
        let (mut host, updates) = host_with_services(false);

        host.run_update();
        assert_eq!(updates.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn running_game_updates_all_services_continuously() {
        let (mut host, updates) = host_with_services(false);
        host.context.game_running.store(true, Ordering::SeqCst);

        assert_eq!(host.run_update(), Tick::Redraw);
        assert_eq!(host.run_update(), Tick::Redraw);
        assert_eq!(updates.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn game_detection_leaves_the_degraded_cadence() {
        let (mut host, _) = host_with_services(true);

        assert_eq!(host.run_update(), Tick::Wait(POLL_SLICE));
        host.context.game_running.store(true, Ordering::SeqCst);
        assert_eq!(host.run_update(), Tick::Redraw);
        assert!(host.poll.is_none());
    }

    #[test]
    fn skip_next_draw_drops_exactly_one_frame() {
        let (mut host, _) = host_with_services(true);

        host.skip_next_draw();
        host.draw();
        assert_eq!(host.total_frames(), 0);

        host.draw();
        assert_eq!(host.total_frames(), 1);
    }

    #[test]
    fn draw_lag_accumulates_and_resets() {
        let (mut host, _) = host_with_services(true);
        host.context.game_running.store(true, Ordering::SeqCst);

        host.run_update();
        host.run_update();
        assert!(host.draw_lag >= 0.0);

        host.draw();
        assert_eq!(host.draw_lag, 0.0);
    }

    #[test]
    fn double_clicking_a_row_opens_the_assignment_modal() {
        let (mut host, _) = host_with_services(true);
        host.context
            .bindings
            .register(glimmer_ui::KeyBinding::new("Toggle HUD", vec![]));
        host.build_ui();

        // Reach into the queue the way a row's signal handler does.
        let binding = host.context.bindings.find("Toggle HUD").unwrap();
        host.pending_assignments.lock().push(binding);

        host.run_update();
        assert!(host.screen.has_modal());
    }
}
