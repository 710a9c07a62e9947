//! Render boundary for Glimmer.
//!
//! The overlay toolkit does not talk to a GPU. Controls paint into a
//! [`DrawList`] - a CPU-side buffer of high-level draw commands - and a
//! backend consumes the finished list however it likes (GPU quads, a shared
//! frame handed to an injected process, a test assertion). This crate
//! provides:
//!
//! - Basic geometry and color types ([`Point`], [`Size`], [`Rect`], [`Color`])
//! - Paint types ([`Stroke`], [`TextStyle`], alignment)
//! - The [`DrawList`] command buffer with clip and offset stacks
//! - The [`Renderer`] trait backends implement, plus the recording
//!   [`DrawListRenderer`]
//!
//! # Frame lifecycle
//!
//! ```
//! use glimmer_render::{Color, DrawListRenderer, Rect, Renderer, Size};
//!
//! let mut renderer = DrawListRenderer::new(Size::new(1920.0, 1080.0));
//! renderer.begin_frame(Color::TRANSPARENT, Size::new(1920.0, 1080.0));
//! renderer.list().fill_rect(Rect::new(0.0, 0.0, 256.0, 16.0), Color::WHITE * 0.15);
//! let stats = renderer.end_frame();
//! assert_eq!(stats.commands, 1);
//! ```

mod draw_list;
mod paint;
mod renderer;
mod types;

pub use draw_list::{DrawCommand, DrawList, DrawOp};
pub use paint::{HAlign, Stroke, TextStyle, VAlign};
pub use renderer::{DrawListRenderer, FrameStats, Renderer};
pub use types::{Color, Point, Rect, RoundedRect, Size};
