//! The hotkey binding registry.
//!
//! Owns the overlay's [`KeyBinding`]s and tracks which keys are currently
//! held. A binding activates when its entire sequence is down and the key
//! that just went down belongs to it.

use std::collections::HashSet;

use parking_lot::{Mutex, RwLock};

use glimmer_core::Signal;
use glimmer_ui::{Key, KeyBinding, SharedBinding};

/// Registry of hotkey bindings plus pressed-key state.
#[derive(Default)]
pub struct BindingRegistry {
    bindings: RwLock<Vec<SharedBinding>>,
    pressed: Mutex<HashSet<Key>>,
    /// Emitted with the binding's name when its full sequence goes down.
    pub activated: Signal<String>,
}

impl BindingRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding, returning the shared handle.
    pub fn register(&self, binding: KeyBinding) -> SharedBinding {
        let shared = SharedBinding::new(binding);
        self.bindings.write().push(shared.clone());
        shared
    }

    /// All registered bindings.
    pub fn bindings(&self) -> Vec<SharedBinding> {
        self.bindings.read().clone()
    }

    /// Find a binding by display name.
    pub fn find(&self, name: &str) -> Option<SharedBinding> {
        self.bindings
            .read()
            .iter()
            .find(|b| b.name() == name)
            .cloned()
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    /// Record a key going down, activating any binding it completes.
    pub fn key_down(&self, key: Key) {
        let newly_pressed = self.pressed.lock().insert(key);
        if !newly_pressed {
            // OS auto-repeat.
            return;
        }

        let pressed = self.pressed.lock().clone();
        for binding in self.bindings.read().iter() {
            let keys = binding.keys();
            if keys.is_empty() || !keys.contains(&key) {
                continue;
            }
            if keys.iter().all(|k| pressed.contains(k)) {
                tracing::debug!(
                    target: "glimmer_hud::hotkeys",
                    binding = %binding.name(),
                    "hotkey activated"
                );
                self.activated.emit(binding.name().to_string());
            }
        }
    }

    /// Record a key going up.
    pub fn key_up(&self, key: Key) {
        self.pressed.lock().remove(&key);
    }

    /// Clear pressed-key state (e.g. when the overlay loses focus).
    pub fn release_all(&self) {
        self.pressed.lock().clear();
    }

    /// The keys currently held.
    pub fn pressed_keys(&self) -> HashSet<Key> {
        self.pressed.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(registry: &BindingRegistry) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        registry.activated.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        count
    }

    #[test]
    fn full_sequence_activates_once() {
        let registry = BindingRegistry::new();
        registry.register(KeyBinding::new("Toggle HUD", vec![Key::LeftCtrl, Key::H]));
        let count = counting(&registry);

        registry.key_down(Key::LeftCtrl);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        registry.key_down(Key::H);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Holding the combo and pressing something else does not re-fire.
        registry.key_down(Key::J);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn auto_repeat_does_not_refire() {
        let registry = BindingRegistry::new();
        registry.register(KeyBinding::new("Toggle HUD", vec![Key::H]));
        let count = counting(&registry);

        registry.key_down(Key::H);
        registry.key_down(Key::H);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn releasing_and_pressing_again_refires() {
        let registry = BindingRegistry::new();
        registry.register(KeyBinding::new("Toggle HUD", vec![Key::LeftCtrl, Key::H]));
        let count = counting(&registry);

        registry.key_down(Key::LeftCtrl);
        registry.key_down(Key::H);
        registry.key_up(Key::H);
        registry.key_down(Key::H);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn empty_binding_never_activates() {
        let registry = BindingRegistry::new();
        registry.register(KeyBinding::new("Unbound", vec![]));
        let count = counting(&registry);

        registry.key_down(Key::A);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn reassigned_binding_uses_new_keys() {
        let registry = BindingRegistry::new();
        let binding = registry.register(KeyBinding::new("Toggle HUD", vec![Key::H]));
        let count = counting(&registry);

        binding.set_keys(vec![Key::G]);

        registry.key_down(Key::H);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        registry.key_down(Key::G);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn release_all_clears_state() {
        let registry = BindingRegistry::new();
        registry.register(KeyBinding::new("Toggle HUD", vec![Key::LeftCtrl, Key::H]));
        let count = counting(&registry);

        registry.key_down(Key::LeftCtrl);
        registry.release_all();
        registry.key_down(Key::H);

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(registry.pressed_keys().contains(&Key::H));
    }

    #[test]
    fn find_by_name() {
        let registry = BindingRegistry::new();
        registry.register(KeyBinding::new("Toggle HUD", vec![Key::H]));

        assert!(registry.find("Toggle HUD").is_some());
        assert!(registry.find("Missing").is_none());
    }
}
