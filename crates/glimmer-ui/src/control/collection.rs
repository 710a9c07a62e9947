//! Child control ownership and event dispatch.
//!
//! Containers (the [`Screen`](crate::screen::Screen), [`Panel`]) own their
//! children through a [`ControlCollection`], which routes mouse events to the
//! topmost hit child, keeps per-child enter/leave bookkeeping, and captures
//! the mouse on press so the release reaches the pressed control even if the
//! cursor slid off it.
//!
//! [`Panel`]: crate::controls::Panel

use glimmer_render::{DrawList, Point};

use super::events::ControlEvent;
use super::traits::{Control, PaintContext};

/// An ordered set of owned child controls.
///
/// Later children are "on top": they are painted last and hit-tested first.
#[derive(Default)]
pub struct ControlCollection {
    children: Vec<Box<dyn Control>>,
    /// Index of the child currently under the cursor.
    hovered: Option<usize>,
    /// Index of the child that captured the mouse on press.
    captured: Option<usize>,
}

impl ControlCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child, returning its index.
    pub fn add(&mut self, child: Box<dyn Control>) -> usize {
        self.children.push(child);
        self.children.len() - 1
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Borrow a child by index.
    pub fn get(&self, index: usize) -> Option<&dyn Control> {
        self.children.get(index).map(|c| c.as_ref())
    }

    /// Mutably borrow a child by index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Box<dyn Control>> {
        self.children.get_mut(index)
    }

    /// Iterate over the children, bottom-most first.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Control> {
        self.children.iter().map(|c| c.as_ref())
    }

    /// The index of the topmost visible, enabled child containing the given
    /// point (in this container's local coordinates).
    pub fn hit_index(&self, point: Point) -> Option<usize> {
        self.children
            .iter()
            .enumerate()
            .rev()
            .find(|(_, child)| {
                child.is_visible()
                    && child.is_enabled()
                    && child.hit_test(child.base().map_from_parent(point))
            })
            .map(|(index, _)| index)
    }

    /// Dispatch an event (in this container's local coordinates) to the
    /// appropriate child.
    ///
    /// Returns `true` if a child handled the event.
    pub fn dispatch(&mut self, event: &mut ControlEvent) -> bool {
        match event {
            ControlEvent::MouseMove(_) => {
                let hit = event.local_pos().and_then(|p| self.hit_index(p));
                self.update_hover(hit, event.local_pos().unwrap_or(Point::ZERO));

                let target = self.captured.or(hit);
                self.send_to(target, event)
            }
            ControlEvent::MousePress(_) | ControlEvent::DoubleClick(_) => {
                let hit = event.local_pos().and_then(|p| self.hit_index(p));
                if matches!(event, ControlEvent::MousePress(_)) {
                    self.captured = hit;
                }
                self.send_to(hit, event)
            }
            ControlEvent::MouseRelease(_) => {
                let hit = event.local_pos().and_then(|p| self.hit_index(p));
                let target = self.captured.take().or(hit);
                self.send_to(target, event)
            }
            ControlEvent::Leave(_) => {
                // The cursor left this container entirely.
                self.update_hover(None, Point::ZERO);
                self.captured = None;
                false
            }
            // Keyboard and window-enter events are routed by the screen, not
            // by position.
            _ => false,
        }
    }

    /// Send Enter/Leave events as the hovered child changes.
    fn update_hover(&mut self, hit: Option<usize>, point: Point) {
        if self.hovered == hit {
            return;
        }

        if let Some(old) = self.hovered.take() {
            if let Some(child) = self.children.get_mut(old) {
                child.base_mut().set_hovered(false);
                let mut leave = ControlEvent::Leave(super::events::LeaveEvent::new());
                child.handle_event(&mut leave);
            }
        }

        if let Some(new) = hit {
            if let Some(child) = self.children.get_mut(new) {
                child.base_mut().set_hovered(true);
                let local = child.base().map_from_parent(point);
                let mut enter = ControlEvent::Enter(super::events::EnterEvent::new(local));
                child.handle_event(&mut enter);
            }
        }

        self.hovered = hit;
    }

    /// Re-target and deliver an event to one child.
    fn send_to(&mut self, target: Option<usize>, event: &mut ControlEvent) -> bool {
        let Some(index) = target else {
            return false;
        };
        let Some(child) = self.children.get_mut(index) else {
            return false;
        };

        let origin = child.base().pos();
        let mut child_event = event.with_local_offset(-origin.x, -origin.y);
        if deliver(child, &mut child_event) {
            event.accept();
            true
        } else {
            false
        }
    }

    /// Paint all visible children, bottom-most first, clearing their repaint
    /// flags. A container's own visuals are painted before its children.
    pub fn paint_all(&mut self, list: &mut DrawList) {
        for child in &mut self.children {
            paint_control(child, list);
        }
    }
}

/// Deliver an already re-targeted event to a control: its children get first
/// refusal, then the control itself.
pub(crate) fn deliver(child: &mut Box<dyn Control>, event: &mut ControlEvent) -> bool {
    if let Some(kids) = child.child_collection_mut() {
        if kids.dispatch(event) {
            return true;
        }
    }
    child.handle_event(event) || event.is_accepted()
}

/// Paint one control and recurse into its children.
pub(crate) fn paint_control(child: &mut Box<dyn Control>, list: &mut DrawList) {
    if !child.is_visible() {
        return;
    }

    let origin = child.base().pos();
    list.push_offset(origin);
    {
        let mut ctx = PaintContext::new(list, child.rect());
        child.paint(&mut ctx);
    }
    if let Some(kids) = child.child_collection_mut() {
        kids.paint_all(list);
    }
    list.pop_offset();
    child.base_mut().clear_repaint_flag();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::base::ControlBase;
    use crate::control::events::{KeyboardModifiers, MouseButton, MouseMoveEvent, MousePressEvent};
    use glimmer_render::{Color, Rect};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// A probe control that counts the events it receives.
    struct Probe {
        base: ControlBase,
        enters: Arc<AtomicUsize>,
        leaves: Arc<AtomicUsize>,
        presses: Arc<AtomicUsize>,
    }

    impl Probe {
        fn boxed(rect: Rect) -> (Box<dyn Control>, [Arc<AtomicUsize>; 3]) {
            let counters = [
                Arc::new(AtomicUsize::new(0)),
                Arc::new(AtomicUsize::new(0)),
                Arc::new(AtomicUsize::new(0)),
            ];
            let mut base = ControlBase::new();
            base.set_geometry(rect);
            let probe = Probe {
                base,
                enters: counters[0].clone(),
                leaves: counters[1].clone(),
                presses: counters[2].clone(),
            };
            (Box::new(probe), counters)
        }
    }

    impl Control for Probe {
        fn base(&self) -> &ControlBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut ControlBase {
            &mut self.base
        }

        fn paint(&self, ctx: &mut PaintContext<'_>) {
            let rect = ctx.rect();
            ctx.list().fill_rect(rect, Color::WHITE);
        }

        fn handle_event(&mut self, event: &mut ControlEvent) -> bool {
            match event {
                ControlEvent::Enter(_) => {
                    self.enters.fetch_add(1, Ordering::SeqCst);
                }
                ControlEvent::Leave(_) => {
                    self.leaves.fetch_add(1, Ordering::SeqCst);
                }
                ControlEvent::MousePress(_) => {
                    self.presses.fetch_add(1, Ordering::SeqCst);
                    return true;
                }
                _ => {}
            }
            false
        }
    }

    fn move_event(x: f32, y: f32) -> ControlEvent {
        ControlEvent::MouseMove(MouseMoveEvent::new(
            Point::new(x, y),
            Point::new(x, y),
            0,
            KeyboardModifiers::NONE,
        ))
    }

    fn press_event(x: f32, y: f32) -> ControlEvent {
        ControlEvent::MousePress(MousePressEvent::new(
            MouseButton::Left,
            Point::new(x, y),
            Point::new(x, y),
            KeyboardModifiers::NONE,
        ))
    }

    #[test]
    fn topmost_child_wins_hit_test() {
        let mut collection = ControlCollection::new();
        let (below, _) = Probe::boxed(Rect::new(0.0, 0.0, 100.0, 100.0));
        let (above, above_counters) = Probe::boxed(Rect::new(25.0, 25.0, 50.0, 50.0));
        collection.add(below);
        let above_index = collection.add(above);

        assert_eq!(collection.hit_index(Point::new(50.0, 50.0)), Some(above_index));

        collection.dispatch(&mut press_event(50.0, 50.0));
        assert_eq!(above_counters[2].load(Ordering::SeqCst), 1);
    }

    #[test]
    fn hover_sends_enter_then_leave() {
        let mut collection = ControlCollection::new();
        let (child, counters) = Probe::boxed(Rect::new(0.0, 0.0, 10.0, 10.0));
        collection.add(child);

        collection.dispatch(&mut move_event(5.0, 5.0));
        assert_eq!(counters[0].load(Ordering::SeqCst), 1);
        assert_eq!(counters[1].load(Ordering::SeqCst), 0);

        // Moving inside the child does not re-enter.
        collection.dispatch(&mut move_event(6.0, 6.0));
        assert_eq!(counters[0].load(Ordering::SeqCst), 1);

        // Moving off the child leaves it.
        collection.dispatch(&mut move_event(50.0, 50.0));
        assert_eq!(counters[1].load(Ordering::SeqCst), 1);
    }

    #[test]
    fn container_leave_clears_hover() {
        let mut collection = ControlCollection::new();
        let (child, counters) = Probe::boxed(Rect::new(0.0, 0.0, 10.0, 10.0));
        collection.add(child);

        collection.dispatch(&mut move_event(5.0, 5.0));
        collection.dispatch(&mut ControlEvent::Leave(crate::control::events::LeaveEvent::new()));
        assert_eq!(counters[1].load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handled_press_accepts_event() {
        let mut collection = ControlCollection::new();
        let (child, _) = Probe::boxed(Rect::new(0.0, 0.0, 10.0, 10.0));
        collection.add(child);

        let mut event = press_event(5.0, 5.0);
        assert!(collection.dispatch(&mut event));
        assert!(event.is_accepted());

        let mut miss = press_event(50.0, 50.0);
        assert!(!collection.dispatch(&mut miss));
        assert!(!miss.is_accepted());
    }

    #[test]
    fn invisible_children_are_not_hit() {
        let mut collection = ControlCollection::new();
        let (child, counters) = Probe::boxed(Rect::new(0.0, 0.0, 10.0, 10.0));
        let index = collection.add(child);
        collection.get_mut(index).unwrap().set_visible(false);

        collection.dispatch(&mut press_event(5.0, 5.0));
        assert_eq!(counters[2].load(Ordering::SeqCst), 0);
    }

    #[test]
    fn paint_walks_visible_children_with_offsets() {
        let mut collection = ControlCollection::new();
        let (a, _) = Probe::boxed(Rect::new(10.0, 10.0, 5.0, 5.0));
        let (b, _) = Probe::boxed(Rect::new(20.0, 0.0, 5.0, 5.0));
        let (hidden, _) = Probe::boxed(Rect::new(0.0, 0.0, 5.0, 5.0));
        collection.add(a);
        collection.add(b);
        let hidden_index = collection.add(hidden);
        collection.get_mut(hidden_index).unwrap().set_visible(false);

        let mut list = DrawList::new();
        collection.paint_all(&mut list);

        assert_eq!(list.len(), 2);
        match &list.ops()[0].command {
            glimmer_render::DrawCommand::FillRect { rect, .. } => {
                assert_eq!(*rect, Rect::new(10.0, 10.0, 5.0, 5.0));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
