//! Frame bookkeeping.
//!
//! The host feeds the accumulated draw lag into the [`FrameCounter`] on
//! every counted frame; the counter folds that into a once-a-second FPS
//! figure. Nothing draws it (there is no debug overlay), but it is cheap
//! and shows up in trace logs.

use std::time::Duration;

use parking_lot::Mutex;

use crate::service::{HudContext, Service, UpdateTick};

#[derive(Debug, Default)]
struct CounterState {
    frames: u32,
    elapsed: f32,
    fps: f32,
    total_frames: u64,
}

/// Rolling frames-per-second counter.
#[derive(Debug, Default)]
pub struct FrameCounter {
    state: Mutex<CounterState>,
}

impl FrameCounter {
    /// Create a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one drawn frame that took `lag_seconds` of update time.
    pub fn tick_frame(&self, lag_seconds: f32) {
        let mut state = self.state.lock();
        state.frames += 1;
        state.total_frames += 1;
        state.elapsed += lag_seconds;

        if state.elapsed >= 1.0 {
            state.fps = state.frames as f32 / state.elapsed;
            tracing::trace!(target: "glimmer_hud::debug", fps = state.fps);
            state.frames = 0;
            state.elapsed = 0.0;
        }
    }

    /// The most recently computed FPS figure.
    pub fn fps(&self) -> f32 {
        self.state.lock().fps
    }

    /// Total frames counted since startup.
    pub fn total_frames(&self) -> u64 {
        self.state.lock().total_frames
    }
}

/// Essential service owning the frame counter.
pub struct DebugService {
    counter: std::sync::Arc<FrameCounter>,
    since_report: Duration,
}

impl DebugService {
    /// Create the service around a shared counter (the host keeps a clone to
    /// tick on draw).
    pub fn new(counter: std::sync::Arc<FrameCounter>) -> Self {
        Self {
            counter,
            since_report: Duration::ZERO,
        }
    }
}

impl Service for DebugService {
    fn name(&self) -> &'static str {
        "debug"
    }

    fn essential(&self) -> bool {
        true
    }

    fn update(&mut self, _ctx: &HudContext, tick: &UpdateTick) {
        self.since_report += tick.elapsed;
        if self.since_report >= Duration::from_secs(30) {
            tracing::debug!(
                target: "glimmer_hud::debug",
                fps = self.counter.fps(),
                total_frames = self.counter.total_frames(),
            );
            self.since_report = Duration::ZERO;
        }
    }
}
