//! The root of the control tree.
//!
//! [`Screen`] owns the overlay's controls and an application-modal stack.
//! Input arrives here (already translated into [`ControlEvent`]s) and is
//! routed: when a modal is open it receives everything; otherwise events are
//! dispatched to the children by hit-testing. Painting walks children
//! bottom-most first, modals last.

use glimmer_render::{DrawList, Rect, Size};

use crate::control::collection::ControlCollection;
use crate::control::events::ControlEvent;
use crate::control::traits::Control;

/// The root container for the overlay's control tree.
pub struct Screen {
    size: Size,
    children: ControlCollection,
    /// Application-modal controls; the last entry is active.
    modals: Vec<Box<dyn Control>>,
}

impl Screen {
    /// Create a screen with the given size (usually the window size).
    pub fn new(size: Size) -> Self {
        Self {
            size,
            children: ControlCollection::new(),
            modals: Vec::new(),
        }
    }

    /// The screen size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Update the screen size (on window resize). Open modals are re-centered.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        let center = self.center();
        for modal in &mut self.modals {
            let rect = Rect::from_center(center, modal.size());
            modal.set_geometry(rect);
        }
    }

    fn center(&self) -> glimmer_render::Point {
        Rect {
            origin: glimmer_render::Point::ZERO,
            size: self.size,
        }
        .center()
    }

    /// Add a top-level child control, returning its index.
    pub fn add_child(&mut self, child: Box<dyn Control>) -> usize {
        self.children.add(child)
    }

    /// The top-level children.
    pub fn children(&self) -> &ControlCollection {
        &self.children
    }

    /// The top-level children, mutably.
    pub fn children_mut(&mut self) -> &mut ControlCollection {
        &mut self.children
    }

    // =========================================================================
    // Modals
    // =========================================================================

    /// Open an application-modal control, centered on the screen.
    ///
    /// While a modal is open it receives all input.
    pub fn open_modal(&mut self, mut modal: Box<dyn Control>) {
        let rect = Rect::from_center(self.center(), modal.size());
        modal.set_geometry(rect);
        tracing::debug!(target: "glimmer_ui::screen", ?rect, "modal opened");
        self.modals.push(modal);
    }

    /// Close the active modal, returning it.
    pub fn close_modal(&mut self) -> Option<Box<dyn Control>> {
        let modal = self.modals.pop();
        if modal.is_some() {
            tracing::debug!(target: "glimmer_ui::screen", "modal closed");
        }
        modal
    }

    /// Whether a modal is currently open.
    pub fn has_modal(&self) -> bool {
        !self.modals.is_empty()
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Route an event (in screen coordinates) through the control tree.
    ///
    /// Returns `true` if some control handled it.
    pub fn dispatch(&mut self, event: &mut ControlEvent) -> bool {
        if let Some(modal) = self.modals.last_mut() {
            let origin = modal.base().pos();
            let mut modal_event = event.with_local_offset(-origin.x, -origin.y);
            if crate::control::collection::deliver(modal, &mut modal_event) {
                event.accept();
            }

            if modal.wants_close() {
                self.close_modal();
            }

            // Application-modal: input never reaches the tree below.
            return true;
        }

        self.children.dispatch(event)
    }

    // =========================================================================
    // Painting
    // =========================================================================

    /// Paint the whole tree into the draw list, modals on top.
    pub fn paint(&mut self, list: &mut DrawList) {
        self.children.paint_all(list);

        for modal in &mut self.modals {
            crate::control::collection::paint_control(modal, list);
        }
    }
}
