//! A text label control.

use glimmer_render::{Color, HAlign, Size, TextStyle, VAlign};

use crate::control::base::ControlBase;
use crate::control::traits::{Control, PaintContext};

/// A block of aligned text, optionally with the overlay's 1px drop shadow.
pub struct Label {
    base: ControlBase,
    text: String,
    color: Color,
    style: TextStyle,
    /// Draw a black copy offset by (1, 1) behind the text.
    shadow: bool,
}

impl Label {
    /// Create a label with the overlay's default text style (14px, white,
    /// shadowed).
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            base: ControlBase::with_size(Size::new(128.0, 16.0)),
            text: text.into(),
            color: Color::WHITE,
            style: TextStyle::sized(14.0).with_v_align(VAlign::Middle),
            shadow: true,
        }
    }

    /// The label's text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Set the label's text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.text != text {
            self.text = text;
            self.base.update();
        }
    }

    /// Set the text color (builder pattern).
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the horizontal alignment (builder pattern).
    pub fn with_h_align(mut self, h_align: HAlign) -> Self {
        self.style.h_align = h_align;
        self
    }

    /// Disable the drop shadow (builder pattern).
    pub fn without_shadow(mut self) -> Self {
        self.shadow = false;
        self
    }
}

impl Control for Label {
    fn base(&self) -> &ControlBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ControlBase {
        &mut self.base
    }

    fn paint(&self, ctx: &mut PaintContext<'_>) {
        if self.text.is_empty() {
            return;
        }

        let rect = ctx.rect();
        if self.shadow {
            ctx.list()
                .draw_text(self.text.clone(), rect.offset_by(1.0, 1.0), Color::BLACK, self.style);
        }
        ctx.list().draw_text(self.text.clone(), rect, self.color, self.style);
    }
}

static_assertions::assert_impl_all!(Label: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::collection::ControlCollection;
    use glimmer_render::{DrawCommand, DrawList};

    #[test]
    fn shadow_paints_before_text() {
        let mut collection = ControlCollection::new();
        collection.add(Box::new(Label::new("Hotkeys")));

        let mut list = DrawList::new();
        collection.paint_all(&mut list);

        assert_eq!(list.len(), 2);
        match (&list.ops()[0].command, &list.ops()[1].command) {
            (
                DrawCommand::Text { color: shadow, rect: shadow_rect, .. },
                DrawCommand::Text { color: text, rect, .. },
            ) => {
                assert_eq!(*shadow, Color::BLACK);
                assert_eq!(*text, Color::WHITE);
                assert_eq!(*shadow_rect, rect.offset_by(1.0, 1.0));
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn empty_text_paints_nothing() {
        let mut collection = ControlCollection::new();
        collection.add(Box::new(Label::new("")));

        let mut list = DrawList::new();
        collection.paint_all(&mut list);
        assert!(list.is_empty());
    }
}
