//! Mouse input handling and conversion from platform events.
//!
//! [`MouseState`] converts winit mouse events into control events, tracking
//! cursor position, held buttons, and synthesizing double-clicks from press
//! timing and distance.
//!
//! ```ignore
//! let mut mouse = MouseState::new();
//!
//! // From the winit event handler:
//! let event = mouse.handle_cursor_moved(position);
//! screen.dispatch(&mut ControlEvent::MouseMove(event));
//! ```

use std::time::{Duration, Instant};

use winit::event::{ElementState, MouseButton as WinitMouseButton};

use glimmer_render::Point;

use super::events::{
    ControlEvent, EnterEvent, KeyboardModifiers, LeaveEvent, MouseButton, MouseDoubleClickEvent,
    MouseMoveEvent, MousePressEvent, MouseReleaseEvent,
};

/// Default double-click time threshold.
///
/// Two presses must occur within this window to synthesize a double-click.
pub const DEFAULT_DOUBLE_CLICK_TIME: Duration = Duration::from_millis(500);

/// Default double-click distance threshold in pixels.
pub const DEFAULT_DOUBLE_CLICK_DISTANCE: f32 = 5.0;

/// Converts a winit mouse button to a toolkit [`MouseButton`].
pub fn from_winit_mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// State for tracking a potential double-click.
#[derive(Debug, Clone)]
struct ClickState {
    button: MouseButton,
    position: Point,
    time: Instant,
}

/// Stateful winit-to-toolkit mouse event translator.
#[derive(Debug)]
pub struct MouseState {
    /// Current cursor position in window coordinates.
    position: Point,
    /// Currently pressed buttons as a bitfield.
    pressed_buttons: u8,
    /// Current keyboard modifier state.
    modifiers: KeyboardModifiers,
    /// Last press for double-click detection.
    last_click: Option<ClickState>,
    double_click_time: Duration,
    double_click_distance: f32,
    /// Whether the cursor is currently inside the window.
    cursor_in_window: bool,
}

impl Default for MouseState {
    fn default() -> Self {
        Self::new()
    }
}

impl MouseState {
    /// Creates a new mouse state with default double-click settings.
    pub fn new() -> Self {
        Self {
            position: Point::ZERO,
            pressed_buttons: 0,
            modifiers: KeyboardModifiers::NONE,
            last_click: None,
            double_click_time: DEFAULT_DOUBLE_CLICK_TIME,
            double_click_distance: DEFAULT_DOUBLE_CLICK_DISTANCE,
            cursor_in_window: false,
        }
    }

    /// The current cursor position in window coordinates.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Checks if a specific button is currently pressed.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        (self.pressed_buttons & (1 << button as u8)) != 0
    }

    /// Whether the cursor is currently inside the window.
    pub fn is_cursor_in_window(&self) -> bool {
        self.cursor_in_window
    }

    /// Updates the keyboard modifier state carried on generated events.
    pub fn update_modifiers(&mut self, modifiers: KeyboardModifiers) {
        self.modifiers = modifiers;
    }

    /// Handles a cursor moved event.
    pub fn handle_cursor_moved(&mut self, window_pos: Point) -> MouseMoveEvent {
        self.position = window_pos;
        MouseMoveEvent::new(window_pos, window_pos, self.pressed_buttons, self.modifiers)
    }

    /// Handles a mouse button press/release.
    ///
    /// Returns a press, release, or synthesized double-click event. Unmapped
    /// buttons return `None`.
    pub fn handle_mouse_input(
        &mut self,
        state: ElementState,
        button: WinitMouseButton,
    ) -> Option<ControlEvent> {
        let button = from_winit_mouse_button(button)?;

        match state {
            ElementState::Pressed => {
                self.pressed_buttons |= 1 << button as u8;

                let is_double_click = self.last_click.as_ref().is_some_and(|last| {
                    last.button == button
                        && last.time.elapsed() < self.double_click_time
                        && self.position.distance_to(last.position) < self.double_click_distance
                });

                if is_double_click {
                    // Clear state so a triple-click doesn't double-click twice.
                    self.last_click = None;
                    Some(ControlEvent::DoubleClick(MouseDoubleClickEvent::new(
                        button,
                        self.position,
                        self.position,
                        self.modifiers,
                    )))
                } else {
                    self.last_click = Some(ClickState {
                        button,
                        position: self.position,
                        time: Instant::now(),
                    });
                    Some(ControlEvent::MousePress(MousePressEvent::new(
                        button,
                        self.position,
                        self.position,
                        self.modifiers,
                    )))
                }
            }
            ElementState::Released => {
                self.pressed_buttons &= !(1 << button as u8);
                Some(ControlEvent::MouseRelease(MouseReleaseEvent::new(
                    button,
                    self.position,
                    self.position,
                    self.modifiers,
                )))
            }
        }
    }

    /// Handles the cursor entering the window.
    pub fn handle_cursor_entered(&mut self) -> EnterEvent {
        self.cursor_in_window = true;
        EnterEvent::new(self.position)
    }

    /// Handles the cursor leaving the window.
    pub fn handle_cursor_left(&mut self) -> LeaveEvent {
        self.cursor_in_window = false;
        self.last_click = None;
        LeaveEvent::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_conversion() {
        assert_eq!(
            from_winit_mouse_button(WinitMouseButton::Left),
            Some(MouseButton::Left)
        );
        assert_eq!(
            from_winit_mouse_button(WinitMouseButton::Middle),
            Some(MouseButton::Middle)
        );
        assert_eq!(from_winit_mouse_button(WinitMouseButton::Other(12)), None);
    }

    #[test]
    fn button_state_tracking() {
        let mut mouse = MouseState::new();
        assert!(!mouse.is_button_pressed(MouseButton::Left));

        mouse.handle_mouse_input(ElementState::Pressed, WinitMouseButton::Left);
        assert!(mouse.is_button_pressed(MouseButton::Left));

        mouse.handle_mouse_input(ElementState::Pressed, WinitMouseButton::Right);
        assert!(mouse.is_button_pressed(MouseButton::Right));

        mouse.handle_mouse_input(ElementState::Released, WinitMouseButton::Left);
        assert!(!mouse.is_button_pressed(MouseButton::Left));
        assert!(mouse.is_button_pressed(MouseButton::Right));
    }

    #[test]
    fn quick_second_press_is_double_click() {
        let mut mouse = MouseState::new();
        mouse.handle_cursor_moved(Point::new(100.0, 100.0));

        let first = mouse.handle_mouse_input(ElementState::Pressed, WinitMouseButton::Left);
        assert!(matches!(first, Some(ControlEvent::MousePress(_))));
        mouse.handle_mouse_input(ElementState::Released, WinitMouseButton::Left);

        let second = mouse.handle_mouse_input(ElementState::Pressed, WinitMouseButton::Left);
        assert!(matches!(second, Some(ControlEvent::DoubleClick(_))));
    }

    #[test]
    fn different_button_does_not_double_click() {
        let mut mouse = MouseState::new();
        mouse.handle_cursor_moved(Point::new(100.0, 100.0));

        mouse.handle_mouse_input(ElementState::Pressed, WinitMouseButton::Left);
        mouse.handle_mouse_input(ElementState::Released, WinitMouseButton::Left);

        let second = mouse.handle_mouse_input(ElementState::Pressed, WinitMouseButton::Right);
        assert!(matches!(second, Some(ControlEvent::MousePress(_))));
    }

    #[test]
    fn distant_second_press_does_not_double_click() {
        let mut mouse = MouseState::new();
        mouse.handle_cursor_moved(Point::new(100.0, 100.0));
        mouse.handle_mouse_input(ElementState::Pressed, WinitMouseButton::Left);
        mouse.handle_mouse_input(ElementState::Released, WinitMouseButton::Left);

        mouse.handle_cursor_moved(Point::new(200.0, 200.0));
        let second = mouse.handle_mouse_input(ElementState::Pressed, WinitMouseButton::Left);
        assert!(matches!(second, Some(ControlEvent::MousePress(_))));
    }

    #[test]
    fn triple_click_is_not_two_double_clicks() {
        let mut mouse = MouseState::new();
        mouse.handle_cursor_moved(Point::new(10.0, 10.0));

        mouse.handle_mouse_input(ElementState::Pressed, WinitMouseButton::Left);
        mouse.handle_mouse_input(ElementState::Released, WinitMouseButton::Left);
        let second = mouse.handle_mouse_input(ElementState::Pressed, WinitMouseButton::Left);
        assert!(matches!(second, Some(ControlEvent::DoubleClick(_))));
        mouse.handle_mouse_input(ElementState::Released, WinitMouseButton::Left);

        // The click state was consumed; a third press is an ordinary press.
        let third = mouse.handle_mouse_input(ElementState::Pressed, WinitMouseButton::Left);
        assert!(matches!(third, Some(ControlEvent::MousePress(_))));
    }

    #[test]
    fn cursor_enter_leave_tracking() {
        let mut mouse = MouseState::new();
        assert!(!mouse.is_cursor_in_window());

        mouse.handle_cursor_entered();
        assert!(mouse.is_cursor_in_window());

        mouse.handle_cursor_left();
        assert!(!mouse.is_cursor_in_window());
    }
}
