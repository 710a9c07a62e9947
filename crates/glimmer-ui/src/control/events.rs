//! Control-specific event types.
//!
//! Input events flow from the window (translated by
//! [`MouseState`](super::mouse::MouseState) and the keyboard conversion
//! helpers) through the [`Screen`](crate::screen::Screen) to individual
//! controls. Each event carries an accepted flag; a control that consumes an
//! event accepts it to stop further propagation.

use crate::control::keyboard::Key;
use glimmer_render::Point;

/// Keyboard modifiers that may be held during input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held.
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left = 0,
    /// Secondary button (usually right).
    Right = 1,
    /// Middle button (scroll wheel click).
    Middle = 2,
}

/// Common data for all control events.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventBase {
    accepted: bool,
}

impl EventBase {
    /// Create a new event base.
    pub fn new() -> Self {
        Self { accepted: false }
    }

    /// Check if the event has been accepted.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Accept the event, preventing further propagation.
    pub fn accept(&mut self) {
        self.accepted = true;
    }
}

/// Mouse move event.
#[derive(Debug, Clone, Copy)]
pub struct MouseMoveEvent {
    pub base: EventBase,
    /// Position in control-local coordinates.
    pub local_pos: Point,
    /// Position in window coordinates.
    pub window_pos: Point,
    /// Mouse buttons currently held, as a bitfield.
    pub buttons: u8,
    pub modifiers: KeyboardModifiers,
}

impl MouseMoveEvent {
    pub fn new(local_pos: Point, window_pos: Point, buttons: u8, modifiers: KeyboardModifiers) -> Self {
        Self {
            base: EventBase::new(),
            local_pos,
            window_pos,
            buttons,
            modifiers,
        }
    }

    /// Check if a specific button is held.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        (self.buttons & (1 << button as u8)) != 0
    }
}

/// Mouse press event.
#[derive(Debug, Clone, Copy)]
pub struct MousePressEvent {
    pub base: EventBase,
    pub button: MouseButton,
    /// Position in control-local coordinates.
    pub local_pos: Point,
    /// Position in window coordinates.
    pub window_pos: Point,
    pub modifiers: KeyboardModifiers,
}

impl MousePressEvent {
    pub fn new(
        button: MouseButton,
        local_pos: Point,
        window_pos: Point,
        modifiers: KeyboardModifiers,
    ) -> Self {
        Self {
            base: EventBase::new(),
            button,
            local_pos,
            window_pos,
            modifiers,
        }
    }
}

/// Mouse release event.
#[derive(Debug, Clone, Copy)]
pub struct MouseReleaseEvent {
    pub base: EventBase,
    pub button: MouseButton,
    /// Position in control-local coordinates.
    pub local_pos: Point,
    /// Position in window coordinates.
    pub window_pos: Point,
    pub modifiers: KeyboardModifiers,
}

impl MouseReleaseEvent {
    pub fn new(
        button: MouseButton,
        local_pos: Point,
        window_pos: Point,
        modifiers: KeyboardModifiers,
    ) -> Self {
        Self {
            base: EventBase::new(),
            button,
            local_pos,
            window_pos,
            modifiers,
        }
    }
}

/// Mouse double-click event, synthesized by
/// [`MouseState`](super::mouse::MouseState) from press timing.
#[derive(Debug, Clone, Copy)]
pub struct MouseDoubleClickEvent {
    pub base: EventBase,
    pub button: MouseButton,
    /// Position in control-local coordinates.
    pub local_pos: Point,
    /// Position in window coordinates.
    pub window_pos: Point,
    pub modifiers: KeyboardModifiers,
}

impl MouseDoubleClickEvent {
    pub fn new(
        button: MouseButton,
        local_pos: Point,
        window_pos: Point,
        modifiers: KeyboardModifiers,
    ) -> Self {
        Self {
            base: EventBase::new(),
            button,
            local_pos,
            window_pos,
            modifiers,
        }
    }
}

/// Enter event, sent when the mouse enters a control's area.
#[derive(Debug, Clone, Copy)]
pub struct EnterEvent {
    pub base: EventBase,
    /// The position where the mouse entered, in control-local coordinates.
    pub local_pos: Point,
}

impl EnterEvent {
    pub fn new(local_pos: Point) -> Self {
        Self {
            base: EventBase::new(),
            local_pos,
        }
    }
}

/// Leave event, sent when the mouse leaves a control's area.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaveEvent {
    pub base: EventBase,
}

impl LeaveEvent {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Key press event.
#[derive(Debug, Clone, Copy)]
pub struct KeyPressEvent {
    pub base: EventBase,
    pub key: Key,
    pub modifiers: KeyboardModifiers,
    /// Whether this press is an OS auto-repeat.
    pub repeat: bool,
}

impl KeyPressEvent {
    pub fn new(key: Key, modifiers: KeyboardModifiers, repeat: bool) -> Self {
        Self {
            base: EventBase::new(),
            key,
            modifiers,
            repeat,
        }
    }
}

/// Key release event.
#[derive(Debug, Clone, Copy)]
pub struct KeyReleaseEvent {
    pub base: EventBase,
    pub key: Key,
    pub modifiers: KeyboardModifiers,
}

impl KeyReleaseEvent {
    pub fn new(key: Key, modifiers: KeyboardModifiers) -> Self {
        Self {
            base: EventBase::new(),
            key,
            modifiers,
        }
    }
}

/// The events a control can handle.
#[derive(Debug, Clone, Copy)]
pub enum ControlEvent {
    MouseMove(MouseMoveEvent),
    MousePress(MousePressEvent),
    MouseRelease(MouseReleaseEvent),
    DoubleClick(MouseDoubleClickEvent),
    Enter(EnterEvent),
    Leave(LeaveEvent),
    KeyPress(KeyPressEvent),
    KeyRelease(KeyReleaseEvent),
}

impl ControlEvent {
    /// Check if the event has been accepted.
    pub fn is_accepted(&self) -> bool {
        match self {
            Self::MouseMove(e) => e.base.is_accepted(),
            Self::MousePress(e) => e.base.is_accepted(),
            Self::MouseRelease(e) => e.base.is_accepted(),
            Self::DoubleClick(e) => e.base.is_accepted(),
            Self::Enter(e) => e.base.is_accepted(),
            Self::Leave(e) => e.base.is_accepted(),
            Self::KeyPress(e) => e.base.is_accepted(),
            Self::KeyRelease(e) => e.base.is_accepted(),
        }
    }

    /// Accept the event, preventing further propagation.
    pub fn accept(&mut self) {
        match self {
            Self::MouseMove(e) => e.base.accept(),
            Self::MousePress(e) => e.base.accept(),
            Self::MouseRelease(e) => e.base.accept(),
            Self::DoubleClick(e) => e.base.accept(),
            Self::Enter(e) => e.base.accept(),
            Self::Leave(e) => e.base.accept(),
            Self::KeyPress(e) => e.base.accept(),
            Self::KeyRelease(e) => e.base.accept(),
        }
    }

    /// The event's position in the coordinates it was dispatched in, when it
    /// has one.
    pub fn local_pos(&self) -> Option<Point> {
        match self {
            Self::MouseMove(e) => Some(e.local_pos),
            Self::MousePress(e) => Some(e.local_pos),
            Self::MouseRelease(e) => Some(e.local_pos),
            Self::DoubleClick(e) => Some(e.local_pos),
            Self::Enter(e) => Some(e.local_pos),
            _ => None,
        }
    }

    /// The same event re-targeted into a child's coordinate space.
    pub fn with_local_offset(&self, dx: f32, dy: f32) -> ControlEvent {
        let mut event = *self;
        match &mut event {
            ControlEvent::MouseMove(e) => e.local_pos = e.local_pos.offset(dx, dy),
            ControlEvent::MousePress(e) => e.local_pos = e.local_pos.offset(dx, dy),
            ControlEvent::MouseRelease(e) => e.local_pos = e.local_pos.offset(dx, dy),
            ControlEvent::DoubleClick(e) => e.local_pos = e.local_pos.offset(dx, dy),
            ControlEvent::Enter(e) => e.local_pos = e.local_pos.offset(dx, dy),
            _ => {}
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_flag_round_trips() {
        let mut event = ControlEvent::Leave(LeaveEvent::new());
        assert!(!event.is_accepted());
        event.accept();
        assert!(event.is_accepted());
    }

    #[test]
    fn retargeting_shifts_positions() {
        let event = ControlEvent::MousePress(MousePressEvent::new(
            MouseButton::Left,
            Point::new(10.0, 10.0),
            Point::new(110.0, 60.0),
            KeyboardModifiers::NONE,
        ));

        let child = event.with_local_offset(-4.0, -6.0);
        assert_eq!(child.local_pos(), Some(Point::new(6.0, 4.0)));
        // Window position is untouched.
        match child {
            ControlEvent::MousePress(e) => assert_eq!(e.window_pos, Point::new(110.0, 60.0)),
            _ => unreachable!(),
        }
    }

    #[test]
    fn move_event_button_bitfield() {
        let event = MouseMoveEvent::new(
            Point::ZERO,
            Point::ZERO,
            1 << MouseButton::Left as u8,
            KeyboardModifiers::NONE,
        );
        assert!(event.is_button_pressed(MouseButton::Left));
        assert!(!event.is_button_pressed(MouseButton::Right));
    }
}
