//! Deferred one-shot timers.
//!
//! Timers never block: arming one only records a fire time. The host event
//! loop asks [`TimerManager::time_until_next`] when to wake up and then calls
//! [`TimerManager::process_expired`] to collect the timers that fired. All
//! methods take the current [`Instant`] explicitly, so the same manager can
//! be driven by a real clock or by a test.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, TimerError};
use crate::logging::targets;

new_key_type! {
    /// Handle to an armed timer.
    pub struct TimerId;
}

/// Bookkeeping for an armed timer.
#[derive(Debug)]
struct TimerData {
    /// When this timer should fire.
    fire_time: Instant,
}

/// A scheduled fire in the queue.
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
        // Earliest fire time compares greatest.
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Manages the one-shot timers owned by a widget instance.
///
/// Stopped timers are removed from the slot map immediately; their stale
/// queue entries are skipped lazily when they reach the front of the heap.
#[derive(Debug, Default)]
pub struct TimerManager {
    /// All armed timers.
    timers: SlotMap<TimerId, TimerData>,
    /// Pending fires, earliest first.
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerManager {
    /// Create a manager with no timers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot timer that fires `duration` after `now`.
    ///
    /// The returned id cancels the timer through [`stop`](Self::stop).
    pub fn start_one_shot(&mut self, now: Instant, duration: Duration) -> TimerId {
        let fire_time = now + duration;
        let id = self.timers.insert(TimerData { fire_time });
        self.queue.push(TimerQueueEntry { id, fire_time });

        tracing::trace!(target: targets::TIMER, ?id, ?duration, "timer armed");
        id
    }

    /// Cancel an armed timer.
    ///
    /// Returns an error if the timer already fired or was stopped before.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        match self.timers.remove(id) {
            Some(_) => {
                tracing::trace!(target: targets::TIMER, ?id, "timer stopped");
                Ok(())
            }
            None => Err(TimerError::InvalidTimerId),
        }
    }

    /// Check if a timer is still armed.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Get the instant at which an armed timer will fire.
    pub fn fire_time(&self, id: TimerId) -> Option<Instant> {
        self.timers.get(id).map(|t| t.fire_time)
    }

    /// Get the duration from `now` until the next timer fires, if any.
    ///
    /// Returns `Duration::ZERO` for overdue timers and `None` when nothing
    /// is armed.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        // Drop cancelled timers from the front of the queue.
        while let Some(entry) = self.queue.peek() {
            if self.timers.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }

        self.queue
            .peek()
            .map(|entry| entry.fire_time.saturating_duration_since(now))
    }

    /// Fire every timer whose deadline is at or before `now`.
    ///
    /// Fired timers are removed and returned in fire-time order.
    #[tracing::instrument(skip(self), target = "carbon_box_core::timer", level = "trace")]
    pub fn process_expired(&mut self, now: Instant) -> Vec<TimerId> {
        let mut fired = Vec::new();

        while let Some(entry) = self.queue.peek().copied() {
            if entry.fire_time > now {
                break;
            }
            self.queue.pop();

            if self.timers.remove(entry.id).is_some() {
                tracing::trace!(target: targets::TIMER, id = ?entry.id, "timer fired");
                fired.push(entry.id);
            }
        }

        fired
    }

    /// Get the number of armed timers.
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }
}
