//! The Glimmer overlay host.
//!
//! This crate assembles the overlay: it creates the transparent always-on-top
//! window, owns the [`ServiceHost`](service::ServiceHost) driving the
//! initialize/load/update/unload lifecycle, watches for the target game
//! process, and runs the per-frame update/draw loop - dropping to a
//! low-frequency polling cadence while the game is not running.

pub mod error;
pub mod host;
pub mod process;
pub mod registry;
pub mod service;
pub mod services;
pub mod settings;

pub use error::HudError;
pub use host::{OverlayHost, PollGate, POLL_SLICE, POLL_SLICES};
pub use process::{ProcessMonitor, GAME_STATE_CHANGED};
pub use registry::BindingRegistry;
pub use service::{HudContext, Service, ServiceHost, UpdateTick};
pub use settings::HudSettings;
