//! The modal hotkey assignment window.
//!
//! Opened by a [`HotkeyAssigner`](super::HotkeyAssigner) double-click. The
//! window records every key pressed while it is open into a staged sequence:
//!
//! - any non-repeat key press appends to the staged sequence (modifiers are
//!   ordinary keys, since a binding is an ordered key list)
//! - **Enter** (or the Accept button) writes the staged sequence into the
//!   binding and closes
//! - **Escape** (or the Cancel button) closes without changing the binding
//! - **Backspace** clears the staged sequence

use glimmer_core::Signal;
use glimmer_render::{Color, HAlign, Rect, Size, Stroke, TextStyle, VAlign};

use crate::binding::SharedBinding;
use crate::control::base::ControlBase;
use crate::control::events::{ControlEvent, MouseButton};
use crate::control::keyboard::Key;
use crate::control::traits::{Control, PaintContext};

const WINDOW_SIZE: Size = Size::new(320.0, 120.0);
const BUTTON_SIZE: Size = Size::new(72.0, 20.0);
const PADDING: f32 = 8.0;

/// Which of the window's self-painted buttons the cursor is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ButtonHover {
    None,
    Accept,
    Cancel,
}

/// Application-modal window that captures a new key sequence for a binding.
pub struct AssignmentWindow {
    base: ControlBase,
    binding: SharedBinding,
    /// Keys recorded so far, in press order.
    staged: Vec<Key>,
    hover: ButtonHover,
    close_requested: bool,

    /// Emitted with the new sequence when the assignment is accepted.
    pub accepted: Signal<Vec<Key>>,
    /// Emitted when the window is dismissed without changing the binding.
    pub cancelled: Signal<()>,
}

impl AssignmentWindow {
    /// Create an assignment window for the given binding.
    pub fn new(binding: SharedBinding) -> Self {
        Self {
            base: ControlBase::with_size(WINDOW_SIZE),
            binding,
            staged: Vec::new(),
            hover: ButtonHover::None,
            close_requested: false,
            accepted: Signal::new(),
            cancelled: Signal::new(),
        }
    }

    /// The keys recorded so far.
    pub fn staged_keys(&self) -> &[Key] {
        &self.staged
    }

    fn accept_rect(&self) -> Rect {
        let rect = self.base.rect();
        Rect::new(
            rect.right() - (BUTTON_SIZE.width + PADDING) * 2.0,
            rect.bottom() - BUTTON_SIZE.height - PADDING,
            BUTTON_SIZE.width,
            BUTTON_SIZE.height,
        )
    }

    fn cancel_rect(&self) -> Rect {
        let rect = self.base.rect();
        Rect::new(
            rect.right() - BUTTON_SIZE.width - PADDING,
            rect.bottom() - BUTTON_SIZE.height - PADDING,
            BUTTON_SIZE.width,
            BUTTON_SIZE.height,
        )
    }

    fn accept(&mut self) {
        self.binding.set_keys(self.staged.clone());
        self.accepted.emit(self.staged.clone());
        self.close_requested = true;
    }

    fn cancel(&mut self) {
        self.cancelled.emit(());
        self.close_requested = true;
    }

    fn record_key(&mut self, key: Key) {
        if key != Key::Unknown && !self.staged.contains(&key) {
            self.staged.push(key);
            self.base.update();
        }
    }

    fn staged_display(&self) -> String {
        self.staged
            .iter()
            .map(Key::name)
            .collect::<Vec<_>>()
            .join(" + ")
    }

    fn paint_button(&self, ctx: &mut PaintContext<'_>, rect: Rect, text: &str, hovered: bool) {
        let fill = Color::WHITE * if hovered { 0.20 } else { 0.15 };
        ctx.list().fill_rect(rect, fill);

        let style = TextStyle::sized(14.0)
            .with_h_align(HAlign::Center)
            .with_v_align(VAlign::Middle);
        ctx.list().draw_text(text, rect, Color::WHITE, style);
    }
}

impl Control for AssignmentWindow {
    fn base(&self) -> &ControlBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ControlBase {
        &mut self.base
    }

    fn wants_close(&self) -> bool {
        self.close_requested
    }

    fn handle_event(&mut self, event: &mut ControlEvent) -> bool {
        match event {
            ControlEvent::KeyPress(e) => {
                match e.key {
                    Key::Escape => self.cancel(),
                    Key::Enter => self.accept(),
                    Key::Backspace => {
                        self.staged.clear();
                        self.base.update();
                    }
                    key => {
                        if !e.repeat {
                            self.record_key(key);
                        }
                    }
                }
                event.accept();
                true
            }
            ControlEvent::MouseMove(e) => {
                let hover = if self.accept_rect().contains(e.local_pos) {
                    ButtonHover::Accept
                } else if self.cancel_rect().contains(e.local_pos) {
                    ButtonHover::Cancel
                } else {
                    ButtonHover::None
                };
                if self.hover != hover {
                    self.hover = hover;
                    self.base.update();
                }
                false
            }
            ControlEvent::Leave(_) => {
                self.hover = ButtonHover::None;
                false
            }
            ControlEvent::MouseRelease(e) if e.button == MouseButton::Left => {
                if self.accept_rect().contains(e.local_pos) {
                    self.accept();
                } else if self.cancel_rect().contains(e.local_pos) {
                    self.cancel();
                }
                event.accept();
                true
            }
            _ => false,
        }
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        let rect = ctx.rect();

        ctx.list().fill_rect(rect, Color::BLACK * 0.85);
        ctx.list()
            .stroke_rect(rect, Stroke::new(Color::WHITE * 0.4, 1.0));

        // Title: the binding being edited.
        let title_rect = Rect::new(PADDING, PADDING, rect.width() - PADDING * 2.0, 16.0);
        ctx.list().draw_text(
            self.binding.name(),
            title_rect,
            Color::WHITE,
            TextStyle::sized(14.0).with_v_align(VAlign::Middle),
        );

        // Staged sequence (or the recording hint), centered.
        let staged = self.staged_display();
        let staged_rect = Rect::new(PADDING, 36.0, rect.width() - PADDING * 2.0, 24.0);
        let (text, color) = if staged.is_empty() {
            ("Press keys...".to_string(), Color::WHITE * 0.6)
        } else {
            (staged, Color::WHITE)
        };
        ctx.list().draw_text(
            text,
            staged_rect,
            color,
            TextStyle::sized(14.0)
                .with_h_align(HAlign::Center)
                .with_v_align(VAlign::Middle),
        );

        self.paint_button(
            ctx,
            self.accept_rect(),
            "Accept",
            self.hover == ButtonHover::Accept,
        );
        self.paint_button(
            ctx,
            self.cancel_rect(),
            "Cancel",
            self.hover == ButtonHover::Cancel,
        );
    }
}

static_assertions::assert_impl_all!(AssignmentWindow: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::KeyBinding;
    use crate::control::events::{KeyPressEvent, KeyboardModifiers, MouseReleaseEvent};
    use glimmer_render::Point;

    fn window() -> AssignmentWindow {
        AssignmentWindow::new(KeyBinding::shared("Toggle HUD", vec![Key::F1]))
    }

    fn key(key: Key) -> ControlEvent {
        ControlEvent::KeyPress(KeyPressEvent::new(key, KeyboardModifiers::NONE, false))
    }

    fn repeat_key(k: Key) -> ControlEvent {
        ControlEvent::KeyPress(KeyPressEvent::new(k, KeyboardModifiers::NONE, true))
    }

    #[test]
    fn records_keys_in_press_order() {
        let mut win = window();
        win.handle_event(&mut key(Key::LeftCtrl));
        win.handle_event(&mut key(Key::LeftShift));
        win.handle_event(&mut key(Key::H));

        assert_eq!(win.staged_keys(), &[Key::LeftCtrl, Key::LeftShift, Key::H]);
    }

    #[test]
    fn duplicate_and_repeat_presses_are_ignored() {
        let mut win = window();
        win.handle_event(&mut key(Key::H));
        win.handle_event(&mut key(Key::H));
        win.handle_event(&mut repeat_key(Key::J));

        assert_eq!(win.staged_keys(), &[Key::H]);
    }

    #[test]
    fn enter_accepts_and_writes_binding() {
        let binding = KeyBinding::shared("Toggle HUD", vec![Key::F1]);
        let mut win = AssignmentWindow::new(binding.clone());

        win.handle_event(&mut key(Key::LeftAlt));
        win.handle_event(&mut key(Key::G));
        win.handle_event(&mut key(Key::Enter));

        assert!(win.wants_close());
        assert_eq!(binding.keys(), vec![Key::LeftAlt, Key::G]);
    }

    #[test]
    fn escape_cancels_without_writing() {
        let binding = KeyBinding::shared("Toggle HUD", vec![Key::F1]);
        let mut win = AssignmentWindow::new(binding.clone());

        win.handle_event(&mut key(Key::G));
        win.handle_event(&mut key(Key::Escape));

        assert!(win.wants_close());
        assert_eq!(binding.keys(), vec![Key::F1]);
    }

    #[test]
    fn backspace_clears_staged_sequence() {
        let mut win = window();
        win.handle_event(&mut key(Key::LeftCtrl));
        win.handle_event(&mut key(Key::Backspace));

        assert!(win.staged_keys().is_empty());
        assert!(!win.wants_close());
    }

    #[test]
    fn accept_button_click_accepts() {
        let binding = KeyBinding::shared("Toggle HUD", vec![Key::F1]);
        let mut win = AssignmentWindow::new(binding.clone());
        win.handle_event(&mut key(Key::K));

        let center = win.accept_rect().center();
        win.handle_event(&mut ControlEvent::MouseRelease(MouseReleaseEvent::new(
            MouseButton::Left,
            center,
            center,
            KeyboardModifiers::NONE,
        )));

        assert!(win.wants_close());
        assert_eq!(binding.keys(), vec![Key::K]);
    }

    #[test]
    fn click_elsewhere_keeps_recording() {
        let mut win = window();
        let outside = Point::new(10.0, 10.0);
        win.handle_event(&mut ControlEvent::MouseRelease(MouseReleaseEvent::new(
            MouseButton::Left,
            outside,
            outside,
            KeyboardModifiers::NONE,
        )));

        assert!(!win.wants_close());
    }
}
