//! The hotkey assigner row.
//!
//! A two-region control: the left region shows the binding's name, the right
//! region shows its current key sequence and highlights under the cursor.
//! Double-clicking (two releases within 600 ms) asks for the assignment
//! window to be opened via the `assignment_requested` signal; the settings
//! panel that built the row wires that signal to
//! [`Screen::open_modal`](crate::screen::Screen::open_modal).

use std::time::{Duration, Instant};

use glimmer_core::Signal;
use glimmer_render::{Color, HAlign, Rect, Size, TextStyle, VAlign};

use crate::binding::SharedBinding;
use crate::control::base::ControlBase;
use crate::control::events::{ControlEvent, MouseButton};
use crate::control::traits::{Control, PaintContext};

/// Gap between the name region and the binding region, in pixels.
const UNIVERSAL_PADDING: f32 = 2.0;

/// Two clicks this close together count as a double-click.
const DOUBLE_CLICK_THRESHOLD: Duration = Duration::from_millis(600);

/// Release-based double-click detector.
///
/// [`register`](Self::register) reports whether the click at the given
/// instant completes a double-click; otherwise the click is recorded as the
/// new reference point. A completed double-click consumes the state, so a
/// third click starts over.
///
/// Takes explicit instants so the timing behavior is testable without
/// sleeping.
#[derive(Debug)]
pub struct DoubleClickGate {
    last_click: Option<Instant>,
    threshold: Duration,
}

impl DoubleClickGate {
    /// Create a gate with the given threshold.
    pub fn new(threshold: Duration) -> Self {
        Self {
            last_click: None,
            threshold,
        }
    }

    /// Record a click. Returns `true` when it completes a double-click.
    pub fn register(&mut self, at: Instant) -> bool {
        if let Some(last) = self.last_click {
            if at.duration_since(last) < self.threshold {
                self.last_click = None;
                return true;
            }
        }
        self.last_click = Some(at);
        false
    }
}

/// A row that displays a hotkey binding and opens the assignment window on
/// double-click.
pub struct HotkeyAssigner {
    base: ControlBase,
    binding: SharedBinding,
    /// Width of the name region; the binding region takes the rest.
    name_width: f32,
    mouse_over_binding: bool,
    gate: DoubleClickGate,

    /// Emitted when the user double-clicks the row, carrying the binding the
    /// assignment window should edit.
    pub assignment_requested: Signal<SharedBinding>,
}

impl HotkeyAssigner {
    /// Create an assigner row for the given binding.
    pub fn new(binding: SharedBinding) -> Self {
        Self {
            base: ControlBase::with_size(Size::new(256.0, 16.0)),
            binding,
            name_width: 96.0,
            mouse_over_binding: false,
            gate: DoubleClickGate::new(DOUBLE_CLICK_THRESHOLD),
            assignment_requested: Signal::new(),
        }
    }

    /// The binding this row displays.
    pub fn binding(&self) -> &SharedBinding {
        &self.binding
    }

    /// Width of the name region.
    pub fn name_width(&self) -> f32 {
        self.name_width
    }

    /// Set the width of the name region.
    pub fn set_name_width(&mut self, width: f32) {
        if self.name_width != width {
            self.name_width = width;
            self.base.update();
        }
    }

    /// Whether the cursor is over the binding region.
    pub fn is_mouse_over_binding(&self) -> bool {
        self.mouse_over_binding
    }

    /// The left region, showing the binding's name.
    pub fn name_region(&self) -> Rect {
        Rect::new(0.0, 0.0, self.name_width, self.base.height())
    }

    /// The right region, showing the key sequence. Starts at the name
    /// region's width plus the fixed padding.
    pub fn binding_region(&self) -> Rect {
        let name = self.name_region();
        Rect::new(
            name.width() + UNIVERSAL_PADDING,
            0.0,
            self.base.width() - name.width() - UNIVERSAL_PADDING,
            self.base.height(),
        )
    }

    fn register_click(&mut self, at: Instant) {
        if self.gate.register(at) {
            tracing::debug!(
                target: "glimmer_ui::hotkey",
                binding = %self.binding.name(),
                "assignment requested"
            );
            self.assignment_requested.emit(self.binding.clone());
        }
    }
}

impl Control for HotkeyAssigner {
    fn base(&self) -> &ControlBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ControlBase {
        &mut self.base
    }

    fn handle_event(&mut self, event: &mut ControlEvent) -> bool {
        match event {
            ControlEvent::MouseMove(e) => {
                let over = self.binding_region().contains(e.local_pos);
                if self.mouse_over_binding != over {
                    self.mouse_over_binding = over;
                    self.base.update();
                }
                false
            }
            ControlEvent::Leave(_) => {
                if self.mouse_over_binding {
                    self.mouse_over_binding = false;
                    self.base.update();
                }
                false
            }
            ControlEvent::MouseRelease(e) if e.button == MouseButton::Left => {
                self.register_click(Instant::now());
                event.accept();
                true
            }
            _ => false,
        }
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        let name_region = self.name_region();
        let binding_region = self.binding_region();

        // Name region panel.
        ctx.list().fill_rect(name_region, Color::WHITE * 0.15);

        // Name, shadowed.
        let name_style = TextStyle::sized(14.0).with_v_align(VAlign::Middle);
        ctx.list().draw_text(
            self.binding.name(),
            name_region.offset_by(UNIVERSAL_PADDING + 1.0, 1.0),
            Color::BLACK,
            name_style,
        );
        ctx.list().draw_text(
            self.binding.name(),
            name_region.offset_by(UNIVERSAL_PADDING, 0.0),
            Color::WHITE,
            name_style,
        );

        // Binding region panel, brighter under the cursor.
        let opacity = if self.mouse_over_binding { 0.20 } else { 0.15 };
        ctx.list().fill_rect(binding_region, Color::WHITE * opacity);

        // Key sequence, centered and shadowed.
        let keys = self.binding.display_keys();
        let keys_style = TextStyle::sized(14.0)
            .with_h_align(HAlign::Center)
            .with_v_align(VAlign::Middle);
        ctx.list().draw_text(
            keys.clone(),
            binding_region.offset_by(1.0, 1.0),
            Color::BLACK,
            keys_style,
        );
        ctx.list()
            .draw_text(keys, binding_region, Color::WHITE, keys_style);
    }
}

static_assertions::assert_impl_all!(HotkeyAssigner: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::KeyBinding;
    use crate::control::events::{
        KeyboardModifiers, LeaveEvent, MouseMoveEvent, MouseReleaseEvent,
    };
    use crate::control::keyboard::Key;
    use glimmer_render::{DrawCommand, DrawList, Point};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn assigner() -> HotkeyAssigner {
        HotkeyAssigner::new(KeyBinding::shared("Toggle HUD", vec![Key::LeftCtrl, Key::H]))
    }

    fn move_to(x: f32, y: f32) -> ControlEvent {
        ControlEvent::MouseMove(MouseMoveEvent::new(
            Point::new(x, y),
            Point::new(x, y),
            0,
            KeyboardModifiers::NONE,
        ))
    }

    fn left_release() -> ControlEvent {
        ControlEvent::MouseRelease(MouseReleaseEvent::new(
            MouseButton::Left,
            Point::new(5.0, 5.0),
            Point::new(5.0, 5.0),
            KeyboardModifiers::NONE,
        ))
    }

    #[test]
    fn binding_region_starts_after_name_plus_padding() {
        let mut row = assigner();
        row.set_name_width(100.0);

        assert_eq!(row.name_region(), Rect::new(0.0, 0.0, 100.0, 16.0));
        assert_eq!(row.binding_region(), Rect::new(102.0, 0.0, 154.0, 16.0));
    }

    #[test]
    fn regions_tile_the_row() {
        let row = assigner();
        let name = row.name_region();
        let binding = row.binding_region();

        assert_eq!(binding.left(), name.width() + 2.0);
        assert_eq!(binding.right(), row.base().width());
    }

    #[test]
    fn hover_tracks_binding_region_only() {
        let mut row = assigner();
        row.set_name_width(100.0);

        row.handle_event(&mut move_to(50.0, 8.0));
        assert!(!row.is_mouse_over_binding());

        row.handle_event(&mut move_to(150.0, 8.0));
        assert!(row.is_mouse_over_binding());

        row.handle_event(&mut ControlEvent::Leave(LeaveEvent::new()));
        assert!(!row.is_mouse_over_binding());
    }

    #[test]
    fn gate_two_quick_clicks_trigger() {
        let mut gate = DoubleClickGate::new(Duration::from_millis(600));
        let t0 = Instant::now();

        assert!(!gate.register(t0));
        assert!(gate.register(t0 + Duration::from_millis(300)));
    }

    #[test]
    fn gate_slow_clicks_never_trigger() {
        let mut gate = DoubleClickGate::new(Duration::from_millis(600));
        let t0 = Instant::now();

        assert!(!gate.register(t0));
        assert!(!gate.register(t0 + Duration::from_millis(600)));
        assert!(!gate.register(t0 + Duration::from_millis(1300)));
    }

    #[test]
    fn gate_resets_after_trigger() {
        let mut gate = DoubleClickGate::new(Duration::from_millis(600));
        let t0 = Instant::now();

        assert!(!gate.register(t0));
        assert!(gate.register(t0 + Duration::from_millis(100)));
        // The pair was consumed; the next click starts a fresh gate.
        assert!(!gate.register(t0 + Duration::from_millis(200)));
        assert!(gate.register(t0 + Duration::from_millis(300)));
    }

    #[test]
    fn double_click_emits_assignment_request() {
        let mut row = assigner();
        let requests = Arc::new(AtomicUsize::new(0));
        let requests_clone = requests.clone();
        row.assignment_requested.connect(move |_| {
            requests_clone.fetch_add(1, Ordering::SeqCst);
        });

        row.handle_event(&mut left_release());
        assert_eq!(requests.load(Ordering::SeqCst), 0);
        row.handle_event(&mut left_release());
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn paint_brightens_binding_region_on_hover() {
        let mut row = assigner();
        row.set_name_width(100.0);
        row.handle_event(&mut move_to(150.0, 8.0));

        let mut list = DrawList::new();
        {
            let mut ctx = PaintContext::new(&mut list, row.rect());
            row.paint(&mut ctx);
        }

        let fills: Vec<Color> = list
            .ops()
            .iter()
            .filter_map(|op| match op.command {
                DrawCommand::FillRect { color, .. } => Some(color),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0], Color::WHITE * 0.15);
        assert_eq!(fills[1], Color::WHITE * 0.20);
    }

    #[test]
    fn paint_centers_key_text_in_binding_region() {
        let row = assigner();

        let mut list = DrawList::new();
        {
            let mut ctx = PaintContext::new(&mut list, row.rect());
            row.paint(&mut ctx);
        }

        let texts: Vec<(&str, Rect, TextStyle)> = list
            .ops()
            .iter()
            .filter_map(|op| match &op.command {
                DrawCommand::Text { text, rect, style, .. } => {
                    Some((text.as_str(), *rect, *style))
                }
                _ => None,
            })
            .collect();

        // Name shadow, name, keys shadow, keys.
        assert_eq!(texts.len(), 4);
        let (keys_text, keys_rect, keys_style) = texts[3];
        assert_eq!(keys_text, "LeftCtrl + H");
        assert_eq!(keys_rect, row.binding_region());
        assert_eq!(keys_style.h_align, HAlign::Center);
        assert_eq!(keys_style.v_align, VAlign::Middle);
    }
}
