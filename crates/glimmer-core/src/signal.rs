//! Signal system for Glimmer.
//!
//! Signals are the notification backbone of the overlay: controls emit them
//! when their state changes (a button was clicked, a binding was reassigned)
//! and interested parties connect closures to react.
//!
//! Everything in the overlay runs on the UI thread, so slots are always
//! invoked directly in the emitting thread. Slots must still be `Send + Sync`
//! so signals can live inside shared state.
//!
//! # Example
//!
//! ```
//! use glimmer_core::Signal;
//!
//! let clicked = Signal::<()>::new();
//! let id = clicked.connect(|_| println!("clicked"));
//! clicked.emit(());
//! clicked.disconnect(id);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific slot via [`Signal::disconnect`].
    pub struct ConnectionId;
}

/// A slot wrapped for storage.
type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A type-safe signal with any number of connected slots.
///
/// When a signal is emitted, all connected slots are invoked in connection
/// order with a reference to the provided argument.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to slots. Use `()` for signals with no
///   payload, or a tuple for several values.
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
    /// Whether emission is temporarily blocked.
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a [`ConnectionId`] that can be used to disconnect later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Connect a slot with an RAII guard that disconnects on drop.
    pub fn connect_guarded<F>(&self, slot: F) -> ConnectionGuard<'_, Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        ConnectionGuard {
            signal: self,
            id: Some(self.connect(slot)),
        }
    }

    /// Disconnect a slot.
    ///
    /// Returns `true` if the connection existed and was removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Emit the signal, invoking every connected slot.
    ///
    /// Slots are invoked outside the connection lock, so a slot may connect
    /// or disconnect other slots without deadlocking.
    pub fn emit(&self, args: Args) {
        if self.blocked.load(Ordering::Relaxed) {
            return;
        }

        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        for slot in slots {
            slot(&args);
        }
    }

    /// Temporarily block or unblock emission.
    ///
    /// Returns the previous blocked state.
    pub fn set_blocked(&self, blocked: bool) -> bool {
        self.blocked.swap(blocked, Ordering::Relaxed)
    }

    /// Check if emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::Relaxed)
    }

    /// The number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .field("blocked", &self.is_blocked())
            .finish()
    }
}

/// RAII guard that disconnects its slot when dropped.
///
/// Obtained from [`Signal::connect_guarded`]. Useful when a consumer's
/// lifetime is shorter than the signal's.
pub struct ConnectionGuard<'a, Args> {
    signal: &'a Signal<Args>,
    id: Option<ConnectionId>,
}

impl<Args> ConnectionGuard<'_, Args> {
    /// Release the guard without disconnecting.
    pub fn detach(mut self) -> ConnectionId {
        self.id.take().expect("guard already detached")
    }
}

impl<Args> Drop for ConnectionGuard<'_, Args> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.signal.disconnect(id);
        }
    }
}

static_assertions::assert_impl_all!(Signal<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn emit_invokes_all_slots() {
        let signal = Signal::<i32>::new();
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let count = count.clone();
            signal.connect(move |v| {
                count.fetch_add(*v as usize, Ordering::SeqCst);
            });
        }

        signal.emit(2);
        assert_eq!(count.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn disconnect_removes_slot() {
        let signal = Signal::<()>::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = hits.clone();
        let id = signal.connect(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        signal.emit(());
        assert!(signal.disconnect(id));
        signal.emit(());

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        // Double disconnect is a no-op.
        assert!(!signal.disconnect(id));
    }

    #[test]
    fn blocked_signal_does_not_emit() {
        let signal = Signal::<()>::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = hits.clone();
        signal.connect(move |_| {
            hits_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!signal.set_blocked(true));
        signal.emit(());
        assert!(signal.set_blocked(false));
        signal.emit(());

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn guard_disconnects_on_drop() {
        let signal = Signal::<()>::new();
        {
            let _guard = signal.connect_guarded(|_| {});
            assert_eq!(signal.connection_count(), 1);
        }
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn slot_may_connect_during_emit() {
        let signal = Arc::new(Signal::<()>::new());
        let signal_clone = signal.clone();
        signal.connect(move |_| {
            signal_clone.connect(|_| {});
        });

        signal.emit(());
        assert_eq!(signal.connection_count(), 2);
    }
}
