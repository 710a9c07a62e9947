//! A plain container control with a translucent background fill.

use glimmer_render::{Color, Size};

use crate::control::base::ControlBase;
use crate::control::collection::ControlCollection;
use crate::control::traits::{Control, PaintContext};

/// A rectangular container: fills its background and hosts child controls.
pub struct Panel {
    base: ControlBase,
    children: ControlCollection,
    background: Color,
}

impl Panel {
    /// Create a panel with the default overlay background (faint black).
    pub fn new(size: Size) -> Self {
        Self {
            base: ControlBase::with_size(size),
            children: ControlCollection::new(),
            background: Color::BLACK * 0.4,
        }
    }

    /// Set the background fill.
    pub fn set_background(&mut self, color: Color) {
        self.background = color;
        self.base.update();
    }

    /// Set the background fill (builder pattern).
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Add a child control, returning its index.
    pub fn add_child(&mut self, child: Box<dyn Control>) -> usize {
        self.children.add(child)
    }
}

impl Control for Panel {
    fn base(&self) -> &ControlBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ControlBase {
        &mut self.base
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        let rect = ctx.rect();
        ctx.list().fill_rect(rect, self.background);
    }

    fn child_collection(&self) -> Option<&ControlCollection> {
        Some(&self.children)
    }

    fn child_collection_mut(&mut self) -> Option<&mut ControlCollection> {
        Some(&mut self.children)
    }
}

static_assertions::assert_impl_all!(Panel: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use glimmer_render::{DrawCommand, DrawList, Point, Rect};

    #[test]
    fn paints_background_then_children() {
        let mut panel = Panel::new(Size::new(300.0, 200.0));
        let mut child = Panel::new(Size::new(50.0, 20.0));
        child.base_mut().set_pos(Point::new(10.0, 10.0));
        panel.add_child(Box::new(child));

        let mut collection = ControlCollection::new();
        collection.add(Box::new(panel));

        let mut list = DrawList::new();
        collection.paint_all(&mut list);

        assert_eq!(list.len(), 2);
        match &list.ops()[1].command {
            DrawCommand::FillRect { rect, .. } => {
                // Child rect is offset by its position within the panel.
                assert_eq!(*rect, Rect::new(10.0, 10.0, 50.0, 20.0));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
