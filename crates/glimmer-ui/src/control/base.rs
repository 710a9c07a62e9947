//! Control base implementation.
//!
//! [`ControlBase`] carries the state every control shares: geometry,
//! visibility, enabled and hover flags, the repaint flag, and the change
//! signals. Control implementations embed it as a field and delegate to it.

use glimmer_core::Signal;
use glimmer_render::{Point, Rect, Size};

/// The base implementation for all controls.
///
/// # Example
///
/// ```ignore
/// struct Crosshair {
///     base: ControlBase,
/// }
///
/// impl Control for Crosshair {
///     fn base(&self) -> &ControlBase { &self.base }
///     fn base_mut(&mut self) -> &mut ControlBase { &mut self.base }
///     fn paint(&self, ctx: &mut PaintContext<'_>) { /* ... */ }
/// }
/// ```
pub struct ControlBase {
    /// The control's geometry (position relative to parent and size).
    geometry: Rect,
    /// Whether the control is visible.
    visible: bool,
    /// Whether the control is enabled (can receive input).
    enabled: bool,
    /// Whether the mouse is currently over this control.
    hovered: bool,
    /// Whether the control needs to be repainted.
    needs_repaint: bool,

    /// Signal emitted when the geometry changes.
    pub geometry_changed: Signal<Rect>,
    /// Signal emitted when visibility changes.
    pub visible_changed: Signal<bool>,
}

impl ControlBase {
    /// Create a new control base with zero geometry.
    pub fn new() -> Self {
        Self {
            geometry: Rect::ZERO,
            visible: true,
            enabled: true,
            hovered: false,
            needs_repaint: true,
            geometry_changed: Signal::new(),
            visible_changed: Signal::new(),
        }
    }

    /// Create a control base with an initial size.
    pub fn with_size(size: Size) -> Self {
        let mut base = Self::new();
        base.geometry.size = size;
        base
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Get the control's geometry (position and size).
    #[inline]
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Set the control's geometry.
    ///
    /// Emits `geometry_changed` if the geometry actually changed.
    pub fn set_geometry(&mut self, rect: Rect) {
        if self.geometry != rect {
            self.geometry = rect;
            self.needs_repaint = true;
            self.geometry_changed.emit(rect);
        }
    }

    /// Get the control's position relative to its parent.
    #[inline]
    pub fn pos(&self) -> Point {
        self.geometry.origin
    }

    /// Set the control's position relative to its parent.
    pub fn set_pos(&mut self, pos: Point) {
        self.set_geometry(Rect {
            origin: pos,
            size: self.geometry.size,
        });
    }

    /// Get the control's size.
    #[inline]
    pub fn size(&self) -> Size {
        self.geometry.size
    }

    /// Set the control's size.
    pub fn set_size(&mut self, size: Size) {
        self.set_geometry(Rect {
            origin: self.geometry.origin,
            size,
        });
    }

    /// Get a rectangle for the control's local coordinate space: always at
    /// (0, 0) with the control's size.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect {
            origin: Point::ZERO,
            size: self.geometry.size,
        }
    }

    /// Get the control's width.
    #[inline]
    pub fn width(&self) -> f32 {
        self.geometry.size.width
    }

    /// Get the control's height.
    #[inline]
    pub fn height(&self) -> f32 {
        self.geometry.size.height
    }

    // =========================================================================
    // Visibility / enabled
    // =========================================================================

    /// Check if the control is visible.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set whether the control is visible.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.needs_repaint = true;
            self.visible_changed.emit(visible);
        }
    }

    /// Check if the control is enabled.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set whether the control is enabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.needs_repaint = true;
        }
    }

    // =========================================================================
    // Hover state
    // =========================================================================

    /// Check if the mouse is currently over this control.
    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Set the hover state (used by the dispatch system).
    pub(crate) fn set_hovered(&mut self, hovered: bool) {
        if self.hovered != hovered {
            self.hovered = hovered;
            self.needs_repaint = true;
        }
    }

    // =========================================================================
    // Repaint
    // =========================================================================

    /// Check if the control needs to be repainted.
    #[inline]
    pub fn needs_repaint(&self) -> bool {
        self.needs_repaint
    }

    /// Request a repaint of the control.
    pub fn update(&mut self) {
        self.needs_repaint = true;
    }

    /// Clear the repaint flag (called after painting).
    pub(crate) fn clear_repaint_flag(&mut self) {
        self.needs_repaint = false;
    }

    // =========================================================================
    // Coordinate mapping
    // =========================================================================

    /// Map a point from control-local coordinates to parent coordinates.
    #[inline]
    pub fn map_to_parent(&self, point: Point) -> Point {
        point.offset(self.geometry.origin.x, self.geometry.origin.y)
    }

    /// Map a point from parent coordinates to control-local coordinates.
    #[inline]
    pub fn map_from_parent(&self, point: Point) -> Point {
        point.offset(-self.geometry.origin.x, -self.geometry.origin.y)
    }

    /// Check if a point (in local coordinates) is inside the control.
    #[inline]
    pub fn contains_point(&self, point: Point) -> bool {
        self.rect().contains(point)
    }
}

impl Default for ControlBase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn geometry_change_emits_signal() {
        let mut base = ControlBase::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = hits.clone();
        base.geometry_changed.connect(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        base.set_geometry(Rect::new(0.0, 0.0, 10.0, 10.0));
        // Setting the same geometry again is a no-op.
        base.set_geometry(Rect::new(0.0, 0.0, 10.0, 10.0));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn local_rect_is_origin_based() {
        let mut base = ControlBase::new();
        base.set_geometry(Rect::new(50.0, 60.0, 20.0, 10.0));

        assert_eq!(base.rect(), Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(base.map_to_parent(Point::ZERO), Point::new(50.0, 60.0));
        assert_eq!(
            base.map_from_parent(Point::new(55.0, 65.0)),
            Point::new(5.0, 5.0)
        );
    }

    #[test]
    fn repaint_flag_lifecycle() {
        let mut base = ControlBase::new();
        assert!(base.needs_repaint());

        base.clear_repaint_flag();
        assert!(!base.needs_repaint());

        base.update();
        assert!(base.needs_repaint());
    }
}
