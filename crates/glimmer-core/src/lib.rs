//! Core systems for Glimmer.
//!
//! This crate provides the foundational pieces of the Glimmer overlay:
//!
//! - **Event Loop**: The main application event loop built on winit
//! - **Signal System**: Type-safe notification between components
//! - **Property System**: Reactive values with change detection
//! - **Timers**: One-shot and repeating timer system
//! - **Task Queue**: Deferred/idle task processing
//!
//! # Signal Example
//!
//! ```
//! use glimmer_core::Signal;
//!
//! let binding_changed = Signal::<String>::new();
//!
//! let conn_id = binding_changed.connect(|name| {
//!     println!("binding changed: {name}");
//! });
//!
//! binding_changed.emit("Toggle HUD".to_string());
//! binding_changed.disconnect(conn_id);
//! ```
//!
//! # Property Example
//!
//! ```
//! use glimmer_core::{Property, Signal};
//!
//! struct Opacity {
//!     value: Property<f32>,
//!     value_changed: Signal<f32>,
//! }
//!
//! impl Opacity {
//!     fn set(&self, v: f32) {
//!         if self.value.set(v) {
//!             self.value_changed.emit(v);
//!         }
//!     }
//! }
//! ```

mod application;
mod error;
mod event;
pub mod logging;
pub mod property;
pub mod signal;
mod task;
mod timer;

pub use application::{Application, EventLoopDriver, Tick, WindowEventHandler};
pub use error::{CoreError, Result, SignalError, TimerError};
pub use event::{EventPriority, HudEvent};
pub use property::Property;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use task::TaskId;
pub use timer::{TimerId, TimerManager};

// Re-export winit types that users of the event loop need.
pub use winit::event_loop::ActiveEventLoop;
pub use winit::window::{Window, WindowAttributes, WindowId};
