//! Property system for Glimmer.
//!
//! A [`Property<T>`] wraps a value with change detection. When `set()` is
//! called it compares the new value against the current one and reports
//! whether anything actually changed, so the owner can emit its paired
//! notification signal only on real changes:
//!
//! ```
//! use glimmer_core::{Property, Signal};
//!
//! struct Binding {
//!     keys: Property<Vec<String>>,
//!     keys_changed: Signal<Vec<String>>,
//! }
//!
//! impl Binding {
//!     fn set_keys(&self, keys: Vec<String>) {
//!         if self.keys.set(keys.clone()) {
//!             self.keys_changed.emit(keys);
//!         }
//!     }
//! }
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A reactive value with change detection.
///
/// Uses interior mutability so owners can expose `&self` setters the way the
/// rest of the toolkit does.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    ///
    /// This clones the value. For large types, prefer [`Property::with`].
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without change detection.
    ///
    /// Useful during initialization or batch updates where notification is
    /// deferred.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if it actually changed.
    ///
    /// The caller should emit the associated notification signal when this
    /// returns `true`.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property").field("value", &self.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_reports_change() {
        let prop = Property::new(42);
        assert_eq!(prop.get(), 42);

        assert!(!prop.set(42));
        assert!(prop.set(100));
        assert_eq!(prop.get(), 100);
    }

    #[test]
    fn replace_returns_old_value() {
        let prop = Property::new("a".to_string());
        assert_eq!(prop.replace("b".to_string()), Some("a".to_string()));
        assert_eq!(prop.replace("b".to_string()), None);
    }

    #[test]
    fn with_avoids_clone() {
        let prop = Property::new(vec![1, 2, 3]);
        let sum: i32 = prop.with(|v| v.iter().sum());
        assert_eq!(sum, 6);
    }

    #[test]
    fn set_silent_skips_detection() {
        let prop = Property::new(1);
        prop.set_silent(1);
        assert!(prop.set(2));
    }
}
