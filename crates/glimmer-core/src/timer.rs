//! Timer system for Glimmer.
//!
//! Provides one-shot and repeating timers that integrate with the event loop.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::error::{Result, TimerError};

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once after the specified duration.
    OneShot,
    /// Fires repeatedly at the specified interval.
    Repeating,
}

#[derive(Debug)]
struct TimerData {
    /// When this timer should next fire.
    next_fire: Instant,
    /// The interval for repeating timers.
    interval: Duration,
    kind: TimerKind,
    active: bool,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order: BinaryHeap is a max-heap, we want earliest first.
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Manages all timers for the application.
pub struct TimerManager {
    timers: SlotMap<TimerId, TimerData>,
    /// Pending fires, earliest first.
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerManager {
    /// Create a new timer manager.
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
        }
    }

    /// Start a one-shot timer that fires after the specified duration.
    pub fn start_one_shot(&mut self, duration: Duration) -> TimerId {
        self.start(duration, TimerKind::OneShot)
    }

    /// Start a repeating timer that fires at the specified interval.
    ///
    /// The first fire occurs after one full `interval`.
    pub fn start_repeating(&mut self, interval: Duration) -> TimerId {
        self.start(interval, TimerKind::Repeating)
    }

    fn start(&mut self, interval: Duration, kind: TimerKind) -> TimerId {
        let next_fire = Instant::now() + interval;
        let id = self.timers.insert(TimerData {
            next_fire,
            interval,
            kind,
            active: true,
        });
        self.queue.push(TimerQueueEntry {
            id,
            fire_time: next_fire,
        });
        id
    }

    /// Stop and remove a timer.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        if self.timers.remove(id).is_some() {
            Ok(())
        } else {
            Err(TimerError::InvalidTimerId.into())
        }
    }

    /// Check if a timer is currently active.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.get(id).is_some_and(|t| t.active)
    }

    /// Get the duration until the next timer fires, if any.
    pub fn time_until_next(&mut self) -> Option<Duration> {
        // Drop stale entries for timers that were stopped.
        while let Some(entry) = self.queue.peek() {
            if self.timers.get(entry.id).is_some_and(|t| t.active) {
                break;
            }
            self.queue.pop();
        }

        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(Instant::now()))
    }

    /// Collect the IDs of all timers that should fire now.
    ///
    /// Repeating timers are rescheduled; one-shot timers are removed.
    pub fn process_expired(&mut self) -> Vec<TimerId> {
        let now = Instant::now();
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek() {
            if entry.fire_time > now {
                break;
            }

            let entry = self.queue.pop().expect("peeked entry vanished");
            let Some(timer) = self.timers.get_mut(entry.id) else {
                continue;
            };
            if !timer.active {
                continue;
            }

            tracing::trace!(target: "glimmer_core::timer", id = ?entry.id, "timer fired");
            fired.push(entry.id);

            match timer.kind {
                TimerKind::OneShot => {
                    self.timers.remove(entry.id);
                }
                TimerKind::Repeating => {
                    timer.next_fire = now + timer.interval;
                    self.queue.push(TimerQueueEntry {
                        id: entry.id,
                        fire_time: timer.next_fire,
                    });
                }
            }
        }

        fired
    }

    /// The number of active timers.
    pub fn active_count(&self) -> usize {
        self.timers.iter().filter(|(_, t)| t.active).count()
    }
}

impl Default for TimerManager {
    fn default() -> Self {
        Self::new()
    }
}

/// A thread-safe wrapper around `TimerManager` for use from the application.
pub(crate) struct SharedTimerManager {
    inner: Mutex<TimerManager>,
}

impl SharedTimerManager {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TimerManager::new()),
        }
    }

    pub fn start_one_shot(&self, duration: Duration) -> TimerId {
        self.inner.lock().start_one_shot(duration)
    }

    pub fn start_repeating(&self, interval: Duration) -> TimerId {
        self.inner.lock().start_repeating(interval)
    }

    pub fn stop(&self, id: TimerId) -> Result<()> {
        self.inner.lock().stop(id)
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.inner.lock().is_active(id)
    }

    pub fn time_until_next(&self) -> Option<Duration> {
        self.inner.lock().time_until_next()
    }

    pub fn process_expired(&self) -> Vec<TimerId> {
        self.inner.lock().process_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once() {
        let mut manager = TimerManager::new();
        let id = manager.start_one_shot(Duration::ZERO);

        let fired = manager.process_expired();
        assert_eq!(fired, vec![id]);
        assert!(!manager.is_active(id));
        assert!(manager.process_expired().is_empty());
    }

    #[test]
    fn repeating_reschedules() {
        let mut manager = TimerManager::new();
        let id = manager.start_repeating(Duration::ZERO);

        assert_eq!(manager.process_expired(), vec![id]);
        assert!(manager.is_active(id));
        // Zero interval: immediately due again.
        assert_eq!(manager.process_expired(), vec![id]);
    }

    #[test]
    fn stop_removes_timer() {
        let mut manager = TimerManager::new();
        let id = manager.start_one_shot(Duration::from_secs(60));
        assert!(manager.is_active(id));

        manager.stop(id).unwrap();
        assert!(!manager.is_active(id));
        assert!(manager.stop(id).is_err());
        assert_eq!(manager.time_until_next(), None);
    }

    #[test]
    fn time_until_next_tracks_earliest() {
        let mut manager = TimerManager::new();
        manager.start_one_shot(Duration::from_secs(60));
        let soon = manager.start_one_shot(Duration::from_millis(5));

        let wait = manager.time_until_next().unwrap();
        assert!(wait <= Duration::from_millis(5));

        manager.stop(soon).unwrap();
        let wait = manager.time_until_next().unwrap();
        assert!(wait > Duration::from_secs(30));
    }

    #[test]
    fn future_timer_does_not_fire() {
        let mut manager = TimerManager::new();
        manager.start_one_shot(Duration::from_secs(60));
        assert!(manager.process_expired().is_empty());
        assert_eq!(manager.active_count(), 1);
    }
}
