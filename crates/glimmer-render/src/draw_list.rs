//! Draw-command accumulator - the bridge between the control layer and
//! renderer backends.
//!
//! Controls emit high-level draw calls in their own local coordinates; the
//! list applies the current offset (pushed by containers while walking the
//! control tree) and clip rectangle, and a backend later converts the
//! commands to whatever primitives it renders with.

use crate::paint::{Stroke, TextStyle};
use crate::types::{Color, Point, Rect, RoundedRect};

/// A single recorded draw command, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        stroke: Stroke,
    },
    FillRoundedRect {
        rounded: RoundedRect,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    /// Text laid out by the backend within `rect` per `style`.
    Text {
        text: String,
        rect: Rect,
        color: Color,
        style: TextStyle,
    },
}

/// A command together with the clip rectangle active when it was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOp {
    /// Clip in screen coordinates; `None` means unclipped.
    pub clip: Option<Rect>,
    pub command: DrawCommand,
}

/// CPU-side command buffer, cleared at the beginning of every frame.
#[derive(Debug, Default)]
pub struct DrawList {
    ops: Vec<DrawOp>,

    // Bookkeeping
    clip_stack: Vec<Rect>,
    offset_stack: Vec<Point>,
    offset: Point,
}

impl DrawList {
    /// Create an empty draw list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all recorded commands and reset the stacks.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.clip_stack.clear();
        self.offset_stack.clear();
        self.offset = Point::ZERO;
    }

    /// The recorded operations, oldest first.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    // ─── offset stack ────────────────────────────────────────────────────────

    /// Push a translation; subsequent commands are shifted by the accumulated
    /// offset. Containers push their children's origins while painting.
    pub fn push_offset(&mut self, delta: Point) {
        self.offset_stack.push(self.offset);
        self.offset = self.offset.offset(delta.x, delta.y);
    }

    /// Restore the offset that was active before the matching `push_offset`.
    pub fn pop_offset(&mut self) {
        if let Some(prev) = self.offset_stack.pop() {
            self.offset = prev;
        }
    }

    /// The accumulated offset currently applied to recorded commands.
    pub fn current_offset(&self) -> Point {
        self.offset
    }

    // ─── clip stack ──────────────────────────────────────────────────────────

    /// Push a clip rectangle (in the current local coordinates), intersected
    /// with the parent clip.
    pub fn push_clip_rect(&mut self, rect: Rect) {
        let screen = self.to_screen_rect(rect);
        let clip = match self.clip_stack.last() {
            Some(&parent) => screen.intersect(parent),
            None => screen,
        };
        self.clip_stack.push(clip);
    }

    /// Pop the top clip rectangle.
    pub fn pop_clip_rect(&mut self) {
        self.clip_stack.pop();
    }

    /// The active clip, in screen coordinates.
    pub fn clip_rect(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    // ─── recording ───────────────────────────────────────────────────────────

    /// Record a filled rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rect = self.to_screen_rect(rect);
        self.push(DrawCommand::FillRect { rect, color });
    }

    /// Record a stroked rectangle outline.
    pub fn stroke_rect(&mut self, rect: Rect, stroke: Stroke) {
        let rect = self.to_screen_rect(rect);
        self.push(DrawCommand::StrokeRect { rect, stroke });
    }

    /// Record a filled rounded rectangle.
    pub fn fill_rounded_rect(&mut self, rounded: RoundedRect, color: Color) {
        let rounded = RoundedRect {
            rect: self.to_screen_rect(rounded.rect),
            radius: rounded.radius,
        };
        self.push(DrawCommand::FillRoundedRect { rounded, color });
    }

    /// Record a line segment.
    pub fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        let from = from.offset(self.offset.x, self.offset.y);
        let to = to.offset(self.offset.x, self.offset.y);
        self.push(DrawCommand::Line { from, to, stroke });
    }

    /// Record text aligned within the given rectangle.
    pub fn draw_text(&mut self, text: impl Into<String>, rect: Rect, color: Color, style: TextStyle) {
        let rect = self.to_screen_rect(rect);
        self.push(DrawCommand::Text {
            text: text.into(),
            rect,
            color,
            style,
        });
    }

    fn to_screen_rect(&self, rect: Rect) -> Rect {
        rect.offset_by(self.offset.x, self.offset.y)
    }

    fn push(&mut self, command: DrawCommand) {
        self.ops.push(DrawOp {
            clip: self.clip_rect(),
            command,
        });
    }
}
