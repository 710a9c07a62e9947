//! The main Application struct and event loop.

use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use winit::application::ApplicationHandler;
use winit::event::{Modifiers, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::WindowId;

use crate::error::{CoreError, Result};
use crate::event::{HudEvent, PrioritizedEvent};
use crate::task::{SharedTaskQueue, TaskId};
use crate::timer::{SharedTimerManager, TimerId};

/// Global application instance.
static APPLICATION: OnceLock<Application> = OnceLock::new();

/// Type alias for window event handler callbacks.
///
/// The callback receives the window ID and window event, and returns whether
/// the event was handled.
pub type WindowEventHandler = Box<dyn Fn(WindowId, &WindowEvent) -> bool + Send + Sync>;

/// What the driver wants the event loop to do until the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Keep the loop hot; the driver is redrawing continuously.
    Redraw,
    /// Wait up to the given duration before ticking again.
    Wait(Duration),
    /// Nothing to do until an external event arrives.
    Idle,
}

/// Lifecycle hooks for the component that actually drives frames.
///
/// The [`Application`] owns the winit plumbing (timers, deferred tasks,
/// proxy wake-ups, control flow); the driver owns the domain: it creates its
/// window in [`resumed`](Self::resumed), consumes input in
/// [`window_event`](Self::window_event), and decides the loop cadence in
/// [`tick`](Self::tick).
pub trait EventLoopDriver {
    /// The event loop has started (or resumed). Create windows here.
    fn resumed(&mut self, event_loop: &ActiveEventLoop);

    /// A raw window event arrived.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: &WindowEvent,
    );

    /// A [`HudEvent`] was delivered (timer fire, custom wake-up, ...).
    fn hud_event(&mut self, event_loop: &ActiveEventLoop, event: &HudEvent) {
        let _ = (event_loop, event);
    }

    /// Called once per loop iteration, before the loop decides how to wait.
    fn tick(&mut self, event_loop: &ActiveEventLoop) -> Tick {
        let _ = event_loop;
        Tick::Idle
    }
}

/// Driver used by [`Application::run`] when no domain driver is installed.
struct NoopDriver;

impl EventLoopDriver for NoopDriver {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        _event: &WindowEvent,
    ) {
    }
}

/// The main application struct, managing the event loop and global state.
///
/// This is a singleton - only one `Application` can exist per process.
///
/// # Example
///
/// ```no_run
/// use glimmer_core::Application;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let app = Application::new()?;
///     // Install handlers, then:
///     Ok(app.run()?)
/// }
/// ```
pub struct Application {
    /// The event loop proxy for sending events from other threads.
    proxy: EventLoopProxy<HudEvent>,
    /// Timer manager (thread-safe).
    timers: SharedTimerManager,
    /// Deferred task queue (thread-safe).
    tasks: SharedTaskQueue,
    /// Internal event queue with priorities.
    event_queue: Mutex<BinaryHeap<PrioritizedEvent>>,
    /// Sequence counter for event ordering.
    event_sequence: AtomicU64,
    /// Flag indicating the application should quit.
    should_quit: AtomicBool,
    /// User-provided event handler.
    event_handler: RwLock<Option<Box<dyn Fn(&HudEvent) + Send + Sync>>>,
    /// User-provided window event handler, called before the driver sees the
    /// raw event.
    window_event_handler: RwLock<Option<WindowEventHandler>>,
    /// Current keyboard modifier state.
    modifiers: Mutex<Modifiers>,
}

impl Application {
    /// Create a new application instance.
    ///
    /// Must be called from the main thread before any other Glimmer
    /// operations. Only one `Application` can exist per process.
    ///
    /// # Errors
    ///
    /// Returns an error if an `Application` has already been initialized, or
    /// if the event loop could not be created.
    pub fn new() -> Result<&'static Application> {
        let event_loop: EventLoop<HudEvent> = EventLoop::with_user_event()
            .build()
            .map_err(|e| CoreError::EventLoopCreation(e.to_string()))?;

        let proxy = event_loop.create_proxy();

        let app = Application {
            proxy,
            timers: SharedTimerManager::new(),
            tasks: SharedTaskQueue::new(),
            event_queue: Mutex::new(BinaryHeap::new()),
            event_sequence: AtomicU64::new(0),
            should_quit: AtomicBool::new(false),
            event_handler: RwLock::new(None),
            window_event_handler: RwLock::new(None),
            modifiers: Mutex::new(Modifiers::default()),
        };

        APPLICATION
            .set(app)
            .map_err(|_| CoreError::ApplicationAlreadyInitialized)?;

        // The event loop itself is !Send, so it lives in thread-local storage
        // until run() consumes it.
        EVENT_LOOP.with(|cell| {
            *cell.borrow_mut() = Some(event_loop);
        });

        Ok(APPLICATION.get().unwrap())
    }

    /// Get the global application instance.
    ///
    /// # Panics
    ///
    /// Panics if `Application::new()` has not been called yet.
    pub fn instance() -> &'static Application {
        APPLICATION
            .get()
            .expect("Application not initialized. Call Application::new() first.")
    }

    /// Try to get the global application instance.
    pub fn try_instance() -> Option<&'static Application> {
        APPLICATION.get()
    }

    /// Run the main event loop without a domain driver.
    ///
    /// Takes ownership of the calling thread until [`quit`](Self::quit) is
    /// called.
    pub fn run(&self) -> Result<()> {
        self.run_with(&mut NoopDriver)
    }

    /// Run the main event loop, forwarding lifecycle callbacks to `driver`.
    pub fn run_with<D: EventLoopDriver>(&self, driver: &mut D) -> Result<()> {
        tracing::info!(target: "glimmer_core::event_loop", "starting event loop");
        let event_loop = EVENT_LOOP.with(|cell| cell.borrow_mut().take());

        let Some(event_loop) = event_loop else {
            return Err(CoreError::EventLoopExited);
        };

        let mut handler = AppHandler { app: self, driver };

        event_loop
            .run_app(&mut handler)
            .map_err(|e| CoreError::EventLoopCreation(e.to_string()))?;

        Ok(())
    }

    /// Request the application to quit.
    ///
    /// The quit is processed on the next loop iteration, not immediately.
    pub fn quit(&self) {
        tracing::info!(target: "glimmer_core::event_loop", "quit requested");
        self.should_quit.store(true, Ordering::SeqCst);
        let _ = self.proxy.send_event(HudEvent::Quit);
    }

    /// Check if a quit has been requested.
    pub fn should_quit(&self) -> bool {
        self.should_quit.load(Ordering::SeqCst)
    }

    /// Post an event to the event loop. Thread-safe.
    pub fn post_event(&self, event: HudEvent) -> Result<()> {
        self.proxy
            .send_event(event)
            .map_err(|_| CoreError::EventLoopExited)
    }

    /// Get a proxy for posting events from other threads.
    pub fn proxy(&self) -> EventLoopProxy<HudEvent> {
        self.proxy.clone()
    }

    /// Set a handler for [`HudEvent`]s.
    pub fn set_event_handler<F>(&self, handler: F)
    where
        F: Fn(&HudEvent) + Send + Sync + 'static,
    {
        *self.event_handler.write() = Some(Box::new(handler));
    }

    /// Set a handler for raw window events.
    ///
    /// The handler runs before the driver sees the event and may claim it by
    /// returning `true`.
    pub fn set_window_event_handler<F>(&self, handler: F)
    where
        F: Fn(WindowId, &WindowEvent) -> bool + Send + Sync + 'static,
    {
        *self.window_event_handler.write() = Some(Box::new(handler));
    }

    /// Get the current keyboard modifier state.
    pub fn modifiers(&self) -> Modifiers {
        *self.modifiers.lock()
    }

    // -------------------------------------------------------------------------
    // Timer API
    // -------------------------------------------------------------------------

    /// Start a one-shot timer that fires after the specified duration.
    pub fn start_timer(&self, duration: Duration) -> TimerId {
        let id = self.timers.start_one_shot(duration);
        // Wake up the event loop to recalculate the next deadline.
        let _ = self.proxy.send_event(HudEvent::WakeUp);
        id
    }

    /// Start a repeating timer that fires at the specified interval.
    pub fn start_repeating_timer(&self, interval: Duration) -> TimerId {
        let id = self.timers.start_repeating(interval);
        let _ = self.proxy.send_event(HudEvent::WakeUp);
        id
    }

    /// Stop a timer.
    pub fn stop_timer(&self, id: TimerId) -> Result<()> {
        self.timers.stop(id)
    }

    /// Check if a timer is active.
    pub fn is_timer_active(&self, id: TimerId) -> bool {
        self.timers.is_active(id)
    }

    // -------------------------------------------------------------------------
    // Task Queue API (idle processing)
    // -------------------------------------------------------------------------

    /// Post a task to be executed during idle time.
    pub fn post_task<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.tasks.post(task);
        let _ = self.proxy.send_event(HudEvent::WakeUp);
        id
    }

    /// Cancel a pending task. Returns `true` if it had not run yet.
    pub fn cancel_task(&self, id: TaskId) -> bool {
        self.tasks.cancel(id)
    }

    // -------------------------------------------------------------------------
    // Internal
    // -------------------------------------------------------------------------

    fn queue_event(&self, event: HudEvent) {
        let sequence = self.event_sequence.fetch_add(1, Ordering::Relaxed);
        self.event_queue
            .lock()
            .push(PrioritizedEvent::new(event, sequence));
    }

    fn pop_queued_event(&self) -> Option<HudEvent> {
        self.event_queue.lock().pop().map(|p| p.event)
    }

    fn dispatch(&self, event: &HudEvent) {
        if let Some(ref handler) = *self.event_handler.read() {
            handler(event);
        }
    }
}

// Thread-local storage for the event loop (EventLoop cannot live in a static).
thread_local! {
    static EVENT_LOOP: std::cell::RefCell<Option<EventLoop<HudEvent>>> =
        const { std::cell::RefCell::new(None) };
}

/// Internal handler that implements winit's ApplicationHandler.
struct AppHandler<'a, D: EventLoopDriver> {
    app: &'a Application,
    driver: &'a mut D,
}

impl<D: EventLoopDriver> AppHandler<'_, D> {
    fn update_control_flow(&self, event_loop: &ActiveEventLoop, tick: Tick) {
        if self.app.should_quit() {
            event_loop.exit();
            return;
        }

        if self.app.tasks.has_pending() {
            event_loop.set_control_flow(ControlFlow::Poll);
            return;
        }

        let timer_wait = self.app.timers.time_until_next();
        let control_flow = match tick {
            Tick::Redraw => ControlFlow::Poll,
            Tick::Wait(wait) => {
                ControlFlow::wait_duration(timer_wait.map_or(wait, |t| t.min(wait)))
            }
            Tick::Idle => match timer_wait {
                Some(t) => ControlFlow::wait_duration(t),
                None => ControlFlow::Wait,
            },
        };

        event_loop.set_control_flow(control_flow);
    }

    fn dispatch_to_driver(&mut self, event_loop: &ActiveEventLoop, event: &HudEvent) {
        self.app.dispatch(event);
        self.driver.hud_event(event_loop, event);
    }
}

impl<D: EventLoopDriver> ApplicationHandler<HudEvent> for AppHandler<'_, D> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.driver.resumed(event_loop);
        self.update_control_flow(event_loop, Tick::Idle);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::ModifiersChanged(modifiers) = &event {
            *self.app.modifiers.lock() = *modifiers;
        }

        let handled = {
            let handler = self.app.window_event_handler.read();
            handler.as_ref().is_some_and(|h| h(window_id, &event))
        };

        if !handled {
            self.driver.window_event(event_loop, window_id, &event);

            if let WindowEvent::CloseRequested = event {
                self.app.quit();
            }
        }

        if self.app.should_quit() {
            event_loop.exit();
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: HudEvent) {
        tracing::trace!(target: "glimmer_core::event_loop", ?event, "received user event");
        match event {
            HudEvent::Quit => {
                event_loop.exit();
                return;
            }
            HudEvent::Timer { .. } => {
                self.dispatch_to_driver(event_loop, &event);
            }
            HudEvent::WakeUp => {
                // Just wake up; control flow is recalculated below.
            }
            HudEvent::Custom { .. } => {
                // Queue for priority-based processing.
                self.app.queue_event(event);
            }
        }

        while let Some(queued) = self.app.pop_queued_event() {
            self.dispatch_to_driver(event_loop, &queued);
        }

        self.update_control_flow(event_loop, Tick::Idle);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Process expired timers.
        for id in self.app.timers.process_expired() {
            self.dispatch_to_driver(event_loop, &HudEvent::Timer { id });
        }

        // Process a batch of idle tasks.
        if self.app.tasks.has_pending() {
            self.app.tasks.process_batch();
        }

        let tick = self.driver.tick(event_loop);
        self.update_control_flow(event_loop, tick);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        tracing::debug!(target: "glimmer_core::event_loop", "event loop exiting");
    }
}
