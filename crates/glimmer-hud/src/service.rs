//! The service lifecycle.
//!
//! The overlay's work is split into services sharing a common lifecycle:
//! initialize once, load once, update every frame, unload at shutdown.
//! Services are owned by the [`ServiceHost`] in registration order - there is
//! no global registry; anything a service needs arrives through its
//! [`HudContext`].
//!
//! While the target game is not running only *essential* services update
//! (process watching, frame bookkeeping); everything else waits for the game.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::error::HudError;
use crate::registry::BindingRegistry;
use crate::settings::HudSettings;

/// Shared state handed to every service lifecycle call.
#[derive(Clone)]
pub struct HudContext {
    /// The settings document (loaded by the settings service).
    pub settings: Arc<RwLock<HudSettings>>,
    /// Whether the target game process is currently running. Written by the
    /// process monitor, read everywhere.
    pub game_running: Arc<AtomicBool>,
    /// The hotkey binding registry.
    pub bindings: Arc<BindingRegistry>,
}

impl HudContext {
    /// Create a context with default settings and no game detected.
    pub fn new() -> Self {
        Self {
            settings: Arc::new(RwLock::new(HudSettings::default())),
            game_running: Arc::new(AtomicBool::new(false)),
            bindings: Arc::new(BindingRegistry::new()),
        }
    }
}

impl Default for HudContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Timing information for one update.
#[derive(Debug, Clone, Copy)]
pub struct UpdateTick {
    /// Time since the previous update.
    pub elapsed: Duration,
    /// Time since the host started.
    pub total: Duration,
}

/// Measures per-update elapsed time for [`UpdateTick`]s.
#[derive(Debug)]
pub struct FrameClock {
    started: Instant,
    last: Instant,
}

impl FrameClock {
    /// Start the clock.
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last: now,
        }
    }

    /// Produce the tick for an update happening now.
    pub fn tick(&mut self) -> UpdateTick {
        let now = Instant::now();
        let tick = UpdateTick {
            elapsed: now.duration_since(self.last),
            total: now.duration_since(self.started),
        };
        self.last = now;
        tick
    }
}

/// A component participating in the shared lifecycle.
pub trait Service: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether this service keeps updating while the game is absent.
    fn essential(&self) -> bool {
        false
    }

    /// One-time initialization; failure aborts startup.
    fn init(&mut self, ctx: &HudContext) -> Result<(), HudError> {
        let _ = ctx;
        Ok(())
    }

    /// Load resources after every service initialized.
    fn load(&mut self, ctx: &HudContext) {
        let _ = ctx;
    }

    /// Per-frame update.
    fn update(&mut self, ctx: &HudContext, tick: &UpdateTick) {
        let _ = (ctx, tick);
    }

    /// Release resources at shutdown.
    fn unload(&mut self, ctx: &HudContext) {
        let _ = ctx;
    }
}

/// Lifecycle phases the host moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    New,
    Initialized,
    Loaded,
    Unloaded,
}

/// The ordered service collection.
///
/// Initialization, loading, and updates run in registration order; unloading
/// runs in reverse so later services can still rely on earlier ones while
/// tearing down.
pub struct ServiceHost {
    services: Vec<Box<dyn Service>>,
    phase: Phase,
}

impl ServiceHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self {
            services: Vec::new(),
            phase: Phase::New,
        }
    }

    /// Register a service. Must happen before [`init_all`](Self::init_all).
    pub fn register(&mut self, service: Box<dyn Service>) {
        assert_eq!(self.phase, Phase::New, "services must be registered before init");
        self.services.push(service);
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether no services are registered.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Initialize all services, in order. Aborts on the first failure.
    pub fn init_all(&mut self, ctx: &HudContext) -> Result<(), HudError> {
        assert_eq!(self.phase, Phase::New, "init_all called twice");
        for service in &mut self.services {
            tracing::debug!(target: "glimmer_hud::services", service = service.name(), "initializing");
            service.init(ctx)?;
        }
        self.phase = Phase::Initialized;
        Ok(())
    }

    /// Let every service load, in order.
    pub fn load_all(&mut self, ctx: &HudContext) {
        assert_eq!(self.phase, Phase::Initialized, "load_all before init_all");
        tracing::debug!(target: "glimmer_hud::services", "loading services");
        for service in &mut self.services {
            service.load(ctx);
        }
        self.phase = Phase::Loaded;
    }

    /// Update every service, in order.
    pub fn update_all(&mut self, ctx: &HudContext, tick: &UpdateTick) {
        debug_assert_eq!(self.phase, Phase::Loaded);
        for service in &mut self.services {
            service.update(ctx, tick);
        }
    }

    /// Update only the essential services (the game is not running).
    pub fn update_essential(&mut self, ctx: &HudContext, tick: &UpdateTick) {
        debug_assert_eq!(self.phase, Phase::Loaded);
        for service in &mut self.services {
            if service.essential() {
                service.update(ctx, tick);
            }
        }
    }

    /// Unload every service, in reverse registration order.
    pub fn unload_all(&mut self, ctx: &HudContext) {
        if self.phase != Phase::Loaded {
            return;
        }
        tracing::debug!(target: "glimmer_hud::services", "unloading services");
        for service in self.services.iter_mut().rev() {
            service.unload(ctx);
        }
        self.phase = Phase::Unloaded;
    }
}

impl Default for ServiceHost {
    fn default() -> Self {
        Self::new()
    }
}
