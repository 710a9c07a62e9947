//! A clickable text button.

use glimmer_core::Signal;
use glimmer_render::{Color, HAlign, Size, TextStyle, VAlign};

use crate::control::base::ControlBase;
use crate::control::events::{ControlEvent, MouseButton};
use crate::control::traits::{Control, PaintContext};

/// A flat button with centered text, hover and pressed fills, and a
/// `clicked` signal.
pub struct TextButton {
    base: ControlBase,
    text: String,
    pressed: bool,
    /// Signal emitted when the button is clicked (press and release inside).
    pub clicked: Signal<()>,
}

impl TextButton {
    /// Create a button with the default overlay size.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            base: ControlBase::with_size(Size::new(96.0, 20.0)),
            text: text.into(),
            pressed: false,
            clicked: Signal::new(),
        }
    }

    /// The button's text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the button is currently held down.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

impl Control for TextButton {
    fn base(&self) -> &ControlBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ControlBase {
        &mut self.base
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        let rect = ctx.rect();

        let fill = if self.pressed {
            Color::WHITE * 0.25
        } else if self.base.is_hovered() {
            Color::WHITE * 0.20
        } else {
            Color::WHITE * 0.15
        };
        ctx.list().fill_rect(rect, fill);

        let style = TextStyle::sized(14.0)
            .with_h_align(HAlign::Center)
            .with_v_align(VAlign::Middle);
        ctx.list()
            .draw_text(self.text.clone(), rect.offset_by(1.0, 1.0), Color::BLACK, style);
        ctx.list().draw_text(self.text.clone(), rect, Color::WHITE, style);
    }

    fn handle_event(&mut self, event: &mut ControlEvent) -> bool {
        match event {
            ControlEvent::MousePress(e) if e.button == MouseButton::Left => {
                self.pressed = true;
                self.base.update();
                event.accept();
                true
            }
            ControlEvent::MouseRelease(e) if e.button == MouseButton::Left => {
                let was_pressed = self.pressed;
                self.pressed = false;
                self.base.update();
                if was_pressed && self.base.contains_point(e.local_pos) {
                    self.clicked.emit(());
                }
                event.accept();
                true
            }
            ControlEvent::Leave(_) => {
                self.pressed = false;
                self.base.update();
                false
            }
            _ => false,
        }
    }
}

static_assertions::assert_impl_all!(TextButton: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::events::{KeyboardModifiers, MousePressEvent, MouseReleaseEvent};
    use glimmer_render::Point;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn press(x: f32, y: f32) -> ControlEvent {
        ControlEvent::MousePress(MousePressEvent::new(
            MouseButton::Left,
            Point::new(x, y),
            Point::new(x, y),
            KeyboardModifiers::NONE,
        ))
    }

    fn release(x: f32, y: f32) -> ControlEvent {
        ControlEvent::MouseRelease(MouseReleaseEvent::new(
            MouseButton::Left,
            Point::new(x, y),
            Point::new(x, y),
            KeyboardModifiers::NONE,
        ))
    }

    #[test]
    fn click_fires_on_release_inside() {
        let mut button = TextButton::new("Accept");
        let clicks = Arc::new(AtomicUsize::new(0));
        let clicks_clone = clicks.clone();
        button.clicked.connect(move |_| {
            clicks_clone.fetch_add(1, Ordering::SeqCst);
        });

        button.handle_event(&mut press(5.0, 5.0));
        assert!(button.is_pressed());
        button.handle_event(&mut release(5.0, 5.0));

        assert!(!button.is_pressed());
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn release_outside_does_not_click() {
        let mut button = TextButton::new("Accept");
        let clicks = Arc::new(AtomicUsize::new(0));
        let clicks_clone = clicks.clone();
        button.clicked.connect(move |_| {
            clicks_clone.fetch_add(1, Ordering::SeqCst);
        });

        button.handle_event(&mut press(5.0, 5.0));
        button.handle_event(&mut release(500.0, 500.0));

        assert_eq!(clicks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn leave_cancels_press() {
        let mut button = TextButton::new("Accept");
        button.handle_event(&mut press(5.0, 5.0));
        button.handle_event(&mut ControlEvent::Leave(
            crate::control::events::LeaveEvent::new(),
        ));
        assert!(!button.is_pressed());
    }
}
