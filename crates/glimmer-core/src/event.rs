//! Custom event types for the Glimmer event loop.

use crate::timer::TimerId;

/// Priority levels for internal events.
/// Higher priority events are processed first within the same loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum EventPriority {
    /// Lowest priority - idle tasks, background work.
    Low = 0,
    /// Normal priority - most application events.
    Normal = 1,
    /// High priority - user input, timers.
    High = 2,
    /// Critical priority - system events, shutdown.
    Critical = 3,
}

impl Default for EventPriority {
    fn default() -> Self {
        Self::Normal
    }
}

/// Internal events dispatched through the Glimmer event loop.
///
/// These are sent via the winit `EventLoopProxy` and processed by the
/// application handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudEvent {
    /// A timer has fired.
    Timer {
        /// The timer that fired.
        id: TimerId,
    },

    /// Request to quit the application.
    Quit,

    /// Wake up the event loop (for polling changes).
    WakeUp,

    /// Domain event. Kind constants are defined by the application crate
    /// (e.g. "game process state changed").
    Custom {
        /// Application-defined event kind identifier.
        kind: u32,
    },
}

impl HudEvent {
    /// Get the priority of this event.
    pub fn priority(&self) -> EventPriority {
        match self {
            Self::Quit => EventPriority::Critical,
            Self::Timer { .. } => EventPriority::High,
            Self::WakeUp => EventPriority::Normal,
            Self::Custom { .. } => EventPriority::Normal,
        }
    }

    /// Create a custom event with a kind identifier.
    pub fn custom(kind: u32) -> Self {
        Self::Custom { kind }
    }
}

/// A wrapper for prioritized events used in the internal queue.
#[derive(Debug)]
pub(crate) struct PrioritizedEvent {
    pub event: HudEvent,
    pub priority: EventPriority,
    /// Sequence number for stable ordering of same-priority events.
    pub sequence: u64,
}

impl PrioritizedEvent {
    pub fn new(event: HudEvent, sequence: u64) -> Self {
        let priority = event.priority();
        Self {
            event,
            priority,
            sequence,
        }
    }
}

impl PartialEq for PrioritizedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl Eq for PrioritizedEvent {}

impl PartialOrd for PrioritizedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PrioritizedEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // BinaryHeap is a max-heap: higher priority is "greater", and for
        // equal priorities the older event (lower sequence) wins.
        match self.priority.cmp(&other.priority) {
            std::cmp::Ordering::Equal => other.sequence.cmp(&self.sequence),
            ord => ord,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    #[test]
    fn quit_outranks_everything() {
        let mut heap = BinaryHeap::new();
        heap.push(PrioritizedEvent::new(HudEvent::WakeUp, 0));
        heap.push(PrioritizedEvent::new(HudEvent::Quit, 1));
        heap.push(PrioritizedEvent::new(HudEvent::custom(7), 2));

        assert_eq!(heap.pop().unwrap().event, HudEvent::Quit);
    }

    #[test]
    fn same_priority_is_fifo() {
        let mut heap = BinaryHeap::new();
        heap.push(PrioritizedEvent::new(HudEvent::custom(1), 0));
        heap.push(PrioritizedEvent::new(HudEvent::custom(2), 1));

        assert_eq!(heap.pop().unwrap().event, HudEvent::custom(1));
        assert_eq!(heap.pop().unwrap().event, HudEvent::custom(2));
    }
}
