//! Retained control toolkit for the Glimmer overlay.
//!
//! Controls are plain structs embedding a [`ControlBase`] and implementing
//! the [`Control`] trait. Containers own their children (`Box<dyn Control>`);
//! there is no global object graph. The [`Screen`] is the root container: it
//! translates window input into control events, routes them by hit-testing
//! (modals first), and walks the tree when painting into a
//! [`DrawList`](glimmer_render::DrawList).
//!
//! The toolkit ships the representative overlay controls: [`Panel`],
//! [`Label`], [`TextButton`], the two-region [`HotkeyAssigner`] row, and the
//! modal [`AssignmentWindow`] it opens on double-click.

pub mod binding;
pub mod control;
pub mod controls;
pub mod screen;

pub use binding::{KeyBinding, ParseKeysError, SharedBinding};
pub use control::base::ControlBase;
pub use control::collection::ControlCollection;
pub use control::events::{
    ControlEvent, EnterEvent, EventBase, KeyPressEvent, KeyReleaseEvent, KeyboardModifiers,
    LeaveEvent, MouseButton, MouseDoubleClickEvent, MouseMoveEvent, MousePressEvent,
    MouseReleaseEvent,
};
pub use control::keyboard::{from_winit_key, from_winit_modifiers, Key};
pub use control::mouse::MouseState;
pub use control::traits::{Control, PaintContext};
pub use controls::{
    AssignmentWindow, DoubleClickGate, HotkeyAssigner, Label, Panel, TextButton,
};
pub use screen::Screen;
