//! Core renderer trait defining the 2D drawing boundary.
//!
//! Backends implement [`Renderer`]; the control layer only ever records into
//! the renderer's [`DrawList`]. The provided [`DrawListRenderer`] is the
//! recording implementation used by the overlay host (a present backend
//! consumes the finished frame) and by tests.

use crate::draw_list::DrawList;
use crate::types::{Color, Size};

/// Statistics from a frame render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Number of draw commands submitted this frame.
    pub commands: u32,
}

/// The 2D rendering boundary.
///
/// # Frame lifecycle
///
/// ```ignore
/// renderer.begin_frame(clear_color, viewport_size);
/// // ... controls record into renderer.list() ...
/// let stats = renderer.end_frame();
/// ```
pub trait Renderer {
    /// Begin a new frame. Must be called before any recording; the previous
    /// frame's commands are discarded.
    fn begin_frame(&mut self, clear_color: Color, viewport: Size);

    /// The command buffer for the current frame.
    fn list(&mut self) -> &mut DrawList;

    /// Finish the current frame, making it available to the backend.
    ///
    /// Returns statistics about the frame that was recorded.
    fn end_frame(&mut self) -> FrameStats;

    /// The viewport size, in logical pixels.
    fn viewport(&self) -> Size;
}

/// A recording renderer.
///
/// Records commands into an owned [`DrawList`]; after [`end_frame`]
/// (`Renderer::end_frame`) the finished frame can be inspected or handed to a
/// present backend via [`frame`](Self::frame).
pub struct DrawListRenderer {
    list: DrawList,
    viewport: Size,
    clear_color: Color,
    in_frame: bool,
}

impl DrawListRenderer {
    /// Create a recording renderer with an initial viewport.
    pub fn new(viewport: Size) -> Self {
        Self {
            list: DrawList::new(),
            viewport,
            clear_color: Color::TRANSPARENT,
            in_frame: false,
        }
    }

    /// Update the viewport (on window resize).
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// The clear color of the most recent frame.
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// The most recently finished frame.
    pub fn frame(&self) -> &DrawList {
        &self.list
    }
}

impl Renderer for DrawListRenderer {
    fn begin_frame(&mut self, clear_color: Color, viewport: Size) {
        self.list.clear();
        self.clear_color = clear_color;
        self.viewport = viewport;
        self.in_frame = true;
    }

    fn list(&mut self) -> &mut DrawList {
        debug_assert!(self.in_frame, "recording outside begin_frame/end_frame");
        &mut self.list
    }

    fn end_frame(&mut self) -> FrameStats {
        self.in_frame = false;
        let stats = FrameStats {
            commands: self.list.len() as u32,
        };
        tracing::trace!(
            target: "glimmer_render",
            commands = stats.commands,
            "frame recorded"
        );
        stats
    }

    fn viewport(&self) -> Size {
        self.viewport
    }
}
