//! The hotkey binding model.
//!
//! A [`KeyBinding`] pairs a display name with an ordered sequence of keys.
//! Bindings are owned by the hotkey registry and shared by reference
//! ([`SharedBinding`]) with the controls that display or reassign them; the
//! binding's interior mutability means an assigner row and the registry
//! observe a reassignment at the same moment.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use glimmer_core::{Property, Signal};

use crate::control::keyboard::{Key, ParseKeyError};

/// A named, ordered key sequence (e.g. `Toggle HUD: LeftCtrl + H`).
pub struct KeyBinding {
    name: String,
    keys: Property<Vec<Key>>,
    /// Emitted with the new sequence whenever the keys are replaced.
    pub changed: Signal<Vec<Key>>,
}

/// A binding shared between its registry and the controls referencing it.
pub type SharedBinding = Arc<KeyBinding>;

impl KeyBinding {
    /// Create a binding with a display name and initial key sequence.
    pub fn new(name: impl Into<String>, keys: Vec<Key>) -> Self {
        Self {
            name: name.into(),
            keys: Property::new(keys),
            changed: Signal::new(),
        }
    }

    /// Create an already-shared binding.
    pub fn shared(name: impl Into<String>, keys: Vec<Key>) -> SharedBinding {
        Arc::new(Self::new(name, keys))
    }

    /// The binding's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current key sequence.
    pub fn keys(&self) -> Vec<Key> {
        self.keys.get()
    }

    /// Replace the key sequence, emitting [`changed`](Self::changed) if it
    /// differs from the current one.
    pub fn set_keys(&self, keys: Vec<Key>) {
        if self.keys.set(keys.clone()) {
            tracing::debug!(
                target: "glimmer_ui::binding",
                name = %self.name,
                keys = %self.display_keys(),
                "binding reassigned"
            );
            self.changed.emit(keys);
        }
    }

    /// The sequence rendered for display: keys joined with `" + "`.
    ///
    /// An empty sequence renders as an empty string.
    pub fn display_keys(&self) -> String {
        self.keys.with(|keys| {
            keys.iter()
                .map(Key::name)
                .collect::<Vec<_>>()
                .join(" + ")
        })
    }

    /// Parse a key sequence from its display form (`"LeftCtrl + C"`).
    ///
    /// Accepts the same aliases as [`Key::from_str`] and tolerates missing
    /// spaces around the `+` separators. An empty string parses as an empty
    /// sequence (an unbound hotkey).
    pub fn parse_keys(s: &str) -> Result<Vec<Key>, ParseKeysError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        trimmed
            .split('+')
            .map(|part| {
                Key::from_str(part.trim()).map_err(|source| ParseKeysError {
                    sequence: s.to_string(),
                    source,
                })
            })
            .collect()
    }
}

impl fmt::Debug for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBinding")
            .field("name", &self.name)
            .field("keys", &self.keys.get())
            .finish()
    }
}

/// Error returned when a key sequence string cannot be parsed.
#[derive(Debug)]
pub struct ParseKeysError {
    sequence: String,
    source: ParseKeyError,
}

impl fmt::Display for ParseKeysError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid key sequence {:?}: {}", self.sequence, self.source)
    }
}

impl std::error::Error for ParseKeysError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
