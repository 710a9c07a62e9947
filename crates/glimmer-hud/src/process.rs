//! Target game process detection.
//!
//! A background thread owns the `sysinfo` handle and rescans the process
//! table when asked (scans are not free, so the cadence is decided by the
//! callers: roughly once a second while the game runs, once per degraded
//! poll cycle while it does not). Presence is published through a shared
//! [`AtomicBool`]; on every change the monitor nudges the event loop awake
//! through the proxy so the host reacts without waiting out its current
//! cadence.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender};
use sysinfo::{ProcessesToUpdate, System};
use winit::event_loop::EventLoopProxy;

use glimmer_core::HudEvent;

/// [`HudEvent::Custom`] kind posted when game presence flips.
pub const GAME_STATE_CHANGED: u32 = 1;

/// Handle to the background process scan thread.
pub struct ProcessMonitor {
    requests: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ProcessMonitor {
    /// Spawn the monitor thread.
    ///
    /// `target` is the executable name compared case-insensitively;
    /// `presence` is flipped on every scan; `proxy` (when given) is nudged
    /// with [`GAME_STATE_CHANGED`] whenever presence changes.
    pub fn spawn(
        target: String,
        presence: Arc<AtomicBool>,
        proxy: Option<EventLoopProxy<HudEvent>>,
    ) -> Self {
        let (requests, receiver) = crossbeam_channel::unbounded();
        let handle = std::thread::Builder::new()
            .name("glimmer-process-monitor".to_string())
            .spawn(move || scan_loop(target, presence, proxy, receiver))
            .expect("spawn process monitor thread");

        let monitor = Self {
            requests: Some(requests),
            handle: Some(handle),
        };
        // Establish initial presence.
        monitor.request_scan();
        monitor
    }

    /// Ask the monitor for a rescan. Cheap; requests coalesce in the channel.
    pub fn request_scan(&self) {
        if let Some(requests) = &self.requests {
            let _ = requests.send(());
        }
    }
}

impl Drop for ProcessMonitor {
    fn drop(&mut self) {
        // Closing the channel ends the scan loop.
        self.requests = None;
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn scan_loop(
    target: String,
    presence: Arc<AtomicBool>,
    proxy: Option<EventLoopProxy<HudEvent>>,
    receiver: Receiver<()>,
) {
    let mut system = System::new();

    while receiver.recv().is_ok() {
        // Drain queued requests; one scan answers them all.
        while receiver.try_recv().is_ok() {}

        system.refresh_processes(ProcessesToUpdate::All, true);
        let running = process_present(&system, &target);

        if presence.swap(running, Ordering::SeqCst) != running {
            tracing::info!(
                target: "glimmer_hud::process",
                %target,
                running,
                "game process state changed"
            );
            if let Some(proxy) = &proxy {
                let _ = proxy.send_event(HudEvent::custom(GAME_STATE_CHANGED));
            }
        }
    }
}

/// Whether a process with the target executable name exists.
fn process_present(system: &System, target: &str) -> bool {
    system
        .processes()
        .values()
        .any(|p| p.name().to_string_lossy().eq_ignore_ascii_case(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn monitor_answers_scan_requests() {
        let presence = Arc::new(AtomicBool::new(true));
        let monitor = ProcessMonitor::spawn(
            "glimmer-test-process-that-does-not-exist.exe".to_string(),
            presence.clone(),
            None,
        );

        // The initial scan finds nothing and clears the flag.
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while presence.load(Ordering::SeqCst) && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(!presence.load(Ordering::SeqCst));

        drop(monitor);
    }

    #[test]
    fn drop_joins_the_thread() {
        let presence = Arc::new(AtomicBool::new(false));
        let monitor = ProcessMonitor::spawn("x.exe".to_string(), presence, None);
        drop(monitor);
    }
}
