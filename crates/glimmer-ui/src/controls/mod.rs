//! The overlay's controls.

mod assignment_window;
mod button;
mod hotkey_assigner;
mod label;
mod panel;

pub use assignment_window::AssignmentWindow;
pub use button::TextButton;
pub use hotkey_assigner::{DoubleClickGate, HotkeyAssigner};
pub use label::Label;
pub use panel::Panel;
