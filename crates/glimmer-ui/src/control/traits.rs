//! Core control trait definitions.

use glimmer_render::{DrawList, Point, Rect, Size};

use super::base::ControlBase;
use super::events::ControlEvent;

/// Context provided during control painting.
///
/// Wraps the frame's draw list together with the control's local rectangle.
/// The list is already translated so that (0, 0) is the control's top-left
/// corner.
pub struct PaintContext<'a> {
    list: &'a mut DrawList,
    control_rect: Rect,
}

impl<'a> PaintContext<'a> {
    /// Create a new paint context.
    pub fn new(list: &'a mut DrawList, control_rect: Rect) -> Self {
        Self { list, control_rect }
    }

    /// The draw list to record into.
    #[inline]
    pub fn list(&mut self) -> &mut DrawList {
        self.list
    }

    /// The control's local rectangle.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.control_rect
    }

    /// The control's width.
    #[inline]
    pub fn width(&self) -> f32 {
        self.control_rect.width()
    }

    /// The control's height.
    #[inline]
    pub fn height(&self) -> f32 {
        self.control_rect.height()
    }
}

/// The core trait for all controls.
///
/// Implementors provide access to their [`ControlBase`] and a
/// [`paint`](Self::paint) method; geometry, visibility, and hit-testing have
/// default implementations that delegate to the base.
///
/// # Example
///
/// ```
/// use glimmer_render::Color;
/// use glimmer_ui::{Control, ControlBase, PaintContext};
///
/// struct Backdrop {
///     base: ControlBase,
///     color: Color,
/// }
///
/// impl Control for Backdrop {
///     fn base(&self) -> &ControlBase { &self.base }
///     fn base_mut(&mut self) -> &mut ControlBase { &mut self.base }
///
///     fn paint(&self, ctx: &mut PaintContext<'_>) {
///         let rect = ctx.rect();
///         ctx.list().fill_rect(rect, self.color);
///     }
/// }
/// ```
pub trait Control: Send + Sync {
    /// Get a reference to the control's base.
    fn base(&self) -> &ControlBase;

    /// Get a mutable reference to the control's base.
    fn base_mut(&mut self) -> &mut ControlBase;

    /// Paint the control.
    ///
    /// The draw list inside the context is already translated so that (0, 0)
    /// is the control's top-left corner.
    fn paint(&self, ctx: &mut PaintContext<'_>);

    /// Handle a control event.
    ///
    /// Return `true` if the event was handled and should not propagate
    /// further. The default implementation handles nothing.
    fn handle_event(&mut self, event: &mut ControlEvent) -> bool {
        let _ = event;
        false
    }

    /// Whether this control wants to be closed.
    ///
    /// Checked by the [`Screen`](crate::screen::Screen) after dispatching
    /// events to a modal; a modal that returns `true` is popped and dropped.
    fn wants_close(&self) -> bool {
        false
    }

    /// The control's children, if it is a container.
    ///
    /// The dispatch and paint walkers recurse through this: children are
    /// hit-tested before the container itself and painted after it.
    fn child_collection(&self) -> Option<&super::collection::ControlCollection> {
        None
    }

    /// The control's children, mutably.
    fn child_collection_mut(&mut self) -> Option<&mut super::collection::ControlCollection> {
        None
    }

    // =========================================================================
    // Defaults delegating to ControlBase
    // =========================================================================

    /// Get the control's geometry (position and size).
    fn geometry(&self) -> Rect {
        self.base().geometry()
    }

    /// Set the control's geometry.
    fn set_geometry(&mut self, rect: Rect) {
        self.base_mut().set_geometry(rect);
    }

    /// Get the control's local rectangle (origin at 0,0).
    fn rect(&self) -> Rect {
        self.base().rect()
    }

    /// Get the control's size.
    fn size(&self) -> Size {
        self.base().size()
    }

    /// Check if the control is visible.
    fn is_visible(&self) -> bool {
        self.base().is_visible()
    }

    /// Set whether the control is visible.
    fn set_visible(&mut self, visible: bool) {
        self.base_mut().set_visible(visible);
    }

    /// Check if the control is enabled.
    fn is_enabled(&self) -> bool {
        self.base().is_enabled()
    }

    /// Check if a point (in local coordinates) is inside the control.
    fn hit_test(&self, point: Point) -> bool {
        self.base().contains_point(point)
    }
}
