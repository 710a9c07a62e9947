//! Keyboard key model and conversion from platform events.
//!
//! [`Key`] identifies a key the way the overlay's bindings name them: a
//! binding is an ordered list of plain keys (`LeftCtrl + C`), so modifier
//! keys are ordinary variants here, not a separate bitset.
//!
//! Keys render and parse through their canonical names (`"F7"`,
//! `"LeftCtrl"`), with a few accepted aliases when parsing (`"Ctrl"`,
//! `"Esc"`, `"Return"`). Serde goes through the same string form so saved
//! bindings stay human-editable.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use winit::keyboard::{Key as WinitKey, NamedKey};

use super::events::KeyboardModifiers;

/// A keyboard key, as named by hotkey bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Function keys
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    // Modifiers
    LeftShift, RightShift,
    LeftCtrl, RightCtrl,
    LeftAlt, RightAlt,
    Meta,

    // Whitespace / editing
    Space, Enter, Tab, Backspace, Delete, Insert, Escape,

    // Navigation
    Home, End, PageUp, PageDown,
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,

    CapsLock,

    /// A key this toolkit does not model.
    Unknown,
}

impl Key {
    /// Whether this key is a modifier.
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Key::LeftShift
                | Key::RightShift
                | Key::LeftCtrl
                | Key::RightCtrl
                | Key::LeftAlt
                | Key::RightAlt
                | Key::Meta
        )
    }

    /// The canonical name this key displays and parses as.
    pub fn name(&self) -> &'static str {
        match self {
            Key::A => "A", Key::B => "B", Key::C => "C", Key::D => "D",
            Key::E => "E", Key::F => "F", Key::G => "G", Key::H => "H",
            Key::I => "I", Key::J => "J", Key::K => "K", Key::L => "L",
            Key::M => "M", Key::N => "N", Key::O => "O", Key::P => "P",
            Key::Q => "Q", Key::R => "R", Key::S => "S", Key::T => "T",
            Key::U => "U", Key::V => "V", Key::W => "W", Key::X => "X",
            Key::Y => "Y", Key::Z => "Z",
            Key::Digit0 => "0", Key::Digit1 => "1", Key::Digit2 => "2",
            Key::Digit3 => "3", Key::Digit4 => "4", Key::Digit5 => "5",
            Key::Digit6 => "6", Key::Digit7 => "7", Key::Digit8 => "8",
            Key::Digit9 => "9",
            Key::F1 => "F1", Key::F2 => "F2", Key::F3 => "F3", Key::F4 => "F4",
            Key::F5 => "F5", Key::F6 => "F6", Key::F7 => "F7", Key::F8 => "F8",
            Key::F9 => "F9", Key::F10 => "F10", Key::F11 => "F11", Key::F12 => "F12",
            Key::LeftShift => "LeftShift",
            Key::RightShift => "RightShift",
            Key::LeftCtrl => "LeftCtrl",
            Key::RightCtrl => "RightCtrl",
            Key::LeftAlt => "LeftAlt",
            Key::RightAlt => "RightAlt",
            Key::Meta => "Meta",
            Key::Space => "Space",
            Key::Enter => "Enter",
            Key::Tab => "Tab",
            Key::Backspace => "Backspace",
            Key::Delete => "Delete",
            Key::Insert => "Insert",
            Key::Escape => "Escape",
            Key::Home => "Home",
            Key::End => "End",
            Key::PageUp => "PageUp",
            Key::PageDown => "PageDown",
            Key::ArrowUp => "ArrowUp",
            Key::ArrowDown => "ArrowDown",
            Key::ArrowLeft => "ArrowLeft",
            Key::ArrowRight => "ArrowRight",
            Key::CapsLock => "CapsLock",
            Key::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a key name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKeyError {
    name: String,
}

impl fmt::Display for ParseKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key name: {:?}", self.name)
    }
}

impl std::error::Error for ParseKeyError {}

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // Single character: letter or digit.
        let mut chars = trimmed.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if let Some(key) = from_char(c.to_ascii_uppercase()) {
                return Ok(key);
            }
        }

        let key = match trimmed.to_ascii_lowercase().as_str() {
            "f1" => Key::F1, "f2" => Key::F2, "f3" => Key::F3, "f4" => Key::F4,
            "f5" => Key::F5, "f6" => Key::F6, "f7" => Key::F7, "f8" => Key::F8,
            "f9" => Key::F9, "f10" => Key::F10, "f11" => Key::F11, "f12" => Key::F12,
            "leftshift" | "shift" => Key::LeftShift,
            "rightshift" => Key::RightShift,
            "leftctrl" | "ctrl" | "control" | "leftcontrol" => Key::LeftCtrl,
            "rightctrl" | "rightcontrol" => Key::RightCtrl,
            "leftalt" | "alt" => Key::LeftAlt,
            "rightalt" => Key::RightAlt,
            "meta" | "super" | "win" => Key::Meta,
            "space" => Key::Space,
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "backspace" => Key::Backspace,
            "delete" => Key::Delete,
            "insert" => Key::Insert,
            "escape" | "esc" => Key::Escape,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" => Key::PageUp,
            "pagedown" => Key::PageDown,
            "arrowup" | "up" => Key::ArrowUp,
            "arrowdown" | "down" => Key::ArrowDown,
            "arrowleft" | "left" => Key::ArrowLeft,
            "arrowright" | "right" => Key::ArrowRight,
            "capslock" => Key::CapsLock,
            _ => {
                return Err(ParseKeyError {
                    name: trimmed.to_string(),
                })
            }
        };
        Ok(key)
    }
}

fn from_char(c: char) -> Option<Key> {
    let key = match c {
        'A' => Key::A, 'B' => Key::B, 'C' => Key::C, 'D' => Key::D,
        'E' => Key::E, 'F' => Key::F, 'G' => Key::G, 'H' => Key::H,
        'I' => Key::I, 'J' => Key::J, 'K' => Key::K, 'L' => Key::L,
        'M' => Key::M, 'N' => Key::N, 'O' => Key::O, 'P' => Key::P,
        'Q' => Key::Q, 'R' => Key::R, 'S' => Key::S, 'T' => Key::T,
        'U' => Key::U, 'V' => Key::V, 'W' => Key::W, 'X' => Key::X,
        'Y' => Key::Y, 'Z' => Key::Z,
        '0' => Key::Digit0, '1' => Key::Digit1, '2' => Key::Digit2,
        '3' => Key::Digit3, '4' => Key::Digit4, '5' => Key::Digit5,
        '6' => Key::Digit6, '7' => Key::Digit7, '8' => Key::Digit8,
        '9' => Key::Digit9,
        _ => return None,
    };
    Some(key)
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Converts a winit logical key to a Glimmer [`Key`].
pub fn from_winit_key(key: &WinitKey) -> Key {
    match key {
        WinitKey::Named(named) => from_winit_named_key(named),
        WinitKey::Character(c) => {
            let mut chars = c.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => from_char(c.to_ascii_uppercase()).unwrap_or(Key::Unknown),
                _ => Key::Unknown,
            }
        }
        _ => Key::Unknown,
    }
}

fn from_winit_named_key(key: &NamedKey) -> Key {
    match key {
        NamedKey::ArrowUp => Key::ArrowUp,
        NamedKey::ArrowDown => Key::ArrowDown,
        NamedKey::ArrowLeft => Key::ArrowLeft,
        NamedKey::ArrowRight => Key::ArrowRight,
        NamedKey::Home => Key::Home,
        NamedKey::End => Key::End,
        NamedKey::PageUp => Key::PageUp,
        NamedKey::PageDown => Key::PageDown,
        NamedKey::Backspace => Key::Backspace,
        NamedKey::Delete => Key::Delete,
        NamedKey::Insert => Key::Insert,
        NamedKey::Enter => Key::Enter,
        NamedKey::Tab => Key::Tab,
        NamedKey::Space => Key::Space,
        NamedKey::Escape => Key::Escape,
        // winit reports the generic modifier for both sides.
        NamedKey::Shift => Key::LeftShift,
        NamedKey::Control => Key::LeftCtrl,
        NamedKey::Alt => Key::LeftAlt,
        NamedKey::Super => Key::Meta,
        NamedKey::CapsLock => Key::CapsLock,
        NamedKey::F1 => Key::F1,
        NamedKey::F2 => Key::F2,
        NamedKey::F3 => Key::F3,
        NamedKey::F4 => Key::F4,
        NamedKey::F5 => Key::F5,
        NamedKey::F6 => Key::F6,
        NamedKey::F7 => Key::F7,
        NamedKey::F8 => Key::F8,
        NamedKey::F9 => Key::F9,
        NamedKey::F10 => Key::F10,
        NamedKey::F11 => Key::F11,
        NamedKey::F12 => Key::F12,
        _ => Key::Unknown,
    }
}

/// Converts winit modifier state to [`KeyboardModifiers`].
pub fn from_winit_modifiers(modifiers: &winit::event::Modifiers) -> KeyboardModifiers {
    let state = modifiers.state();
    KeyboardModifiers {
        shift: state.shift_key(),
        control: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_round_trip() {
        for key in [
            Key::A,
            Key::Digit7,
            Key::F11,
            Key::LeftCtrl,
            Key::Space,
            Key::ArrowLeft,
        ] {
            let parsed: Key = key.name().parse().unwrap();
            assert_eq!(parsed, key);
        }
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!("Ctrl".parse::<Key>().unwrap(), Key::LeftCtrl);
        assert_eq!("esc".parse::<Key>().unwrap(), Key::Escape);
        assert_eq!("Return".parse::<Key>().unwrap(), Key::Enter);
        assert_eq!("shift".parse::<Key>().unwrap(), Key::LeftShift);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("NotAKey".parse::<Key>().is_err());
        assert!("".parse::<Key>().is_err());
    }

    #[test]
    fn lowercase_letters_parse() {
        assert_eq!("c".parse::<Key>().unwrap(), Key::C);
        assert_eq!("9".parse::<Key>().unwrap(), Key::Digit9);
    }

    #[test]
    fn modifiers_are_flagged() {
        assert!(Key::LeftCtrl.is_modifier());
        assert!(Key::Meta.is_modifier());
        assert!(!Key::C.is_modifier());
        assert!(!Key::F5.is_modifier());
    }

    #[test]
    fn winit_character_conversion() {
        let key = from_winit_key(&WinitKey::Character("g".into()));
        assert_eq!(key, Key::G);
    }
}
