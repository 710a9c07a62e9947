//! Game process integration.
//!
//! Owns the [`ProcessMonitor`] and decides when it rescans: roughly once a
//! second while this service updates. During the degraded cadence the host
//! only updates essential services once per poll cycle (~10 s), which is
//! exactly the low-frequency re-check the original loop performed.

use std::sync::atomic::Ordering;
use std::time::Duration;

use glimmer_core::Application;

use crate::error::HudError;
use crate::process::ProcessMonitor;
use crate::service::{HudContext, Service, UpdateTick};

/// Minimum time between rescan requests while updating.
const RECHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Essential service watching for the target game process.
#[derive(Default)]
pub struct GameIntegrationService {
    monitor: Option<ProcessMonitor>,
    since_recheck: Duration,
}

impl GameIntegrationService {
    /// Create the service; the monitor thread starts in
    /// [`init`](Service::init).
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the game process is currently running.
    pub fn is_game_running(ctx: &HudContext) -> bool {
        ctx.game_running.load(Ordering::SeqCst)
    }
}

impl Service for GameIntegrationService {
    fn name(&self) -> &'static str {
        "game-integration"
    }

    fn essential(&self) -> bool {
        true
    }

    fn init(&mut self, ctx: &HudContext) -> Result<(), HudError> {
        let target = ctx.settings.read().target_process.clone();
        // Outside a running Application (unit tests) there is no proxy to
        // nudge; presence still updates through the shared flag.
        let proxy = Application::try_instance().map(|app| app.proxy());
        self.monitor = Some(ProcessMonitor::spawn(
            target,
            ctx.game_running.clone(),
            proxy,
        ));
        Ok(())
    }

    fn update(&mut self, _ctx: &HudContext, tick: &UpdateTick) {
        self.since_recheck += tick.elapsed;
        if self.since_recheck >= RECHECK_INTERVAL {
            self.since_recheck = Duration::ZERO;
            if let Some(monitor) = &self.monitor {
                monitor.request_scan();
            }
        }
    }

    fn unload(&mut self, _ctx: &HudContext) {
        // Dropping the monitor joins the scan thread.
        self.monitor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_spawns_and_unload_joins() {
        let ctx = HudContext::new();
        ctx.settings.write().target_process = "glimmer-no-such-process.exe".to_string();

        let mut service = GameIntegrationService::new();
        service.init(&ctx).unwrap();
        assert!(service.monitor.is_some());

        service.unload(&ctx);
        assert!(service.monitor.is_none());
    }

    #[test]
    fn updates_request_scans_at_most_once_per_interval() {
        let ctx = HudContext::new();
        let mut service = GameIntegrationService::new();
        service.init(&ctx).unwrap();

        // Many small ticks only cross the threshold once.
        let tick = UpdateTick {
            elapsed: Duration::from_millis(400),
            total: Duration::ZERO,
        };
        for _ in 0..3 {
            service.update(&ctx, &tick);
        }
        assert!(service.since_recheck < RECHECK_INTERVAL);

        service.unload(&ctx);
    }
}
