//! Logging facilities for Glimmer.
//!
//! Glimmer uses the `tracing` crate for instrumentation. To see logs, install
//! a subscriber in the application binary:
//!
//! ```ignore
//! tracing_subscriber::fmt::init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem, e.g.
/// `RUST_LOG=glimmer_core::timer=trace`.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "glimmer_core";
    /// Event loop target.
    pub const EVENT_LOOP: &str = "glimmer_core::event_loop";
    /// Timer system target.
    pub const TIMER: &str = "glimmer_core::timer";
    /// Signal system target.
    pub const SIGNAL: &str = "glimmer_core::signal";
}

/// RAII span for timing an operation at debug level.
///
/// ```ignore
/// let _span = PerfSpan::new("screen paint");
/// // ... the timed work ...
/// ```
pub struct PerfSpan {
    name: &'static str,
    start: std::time::Instant,
}

impl PerfSpan {
    /// Start timing the named operation.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for PerfSpan {
    fn drop(&mut self) {
        tracing::debug!(
            target: "glimmer_core::perf",
            operation = self.name,
            elapsed_us = self.start.elapsed().as_micros() as u64,
        );
    }
}
