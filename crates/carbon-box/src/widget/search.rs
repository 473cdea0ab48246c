//! Type-ahead search.
//!
//! Characters typed in quick succession accumulate into a lower-cased
//! buffer that is matched as a case-insensitive prefix against entry
//! labels. The buffer expires through a one-shot timer: every keystroke
//! cancels the pending timer and arms a fresh one, so at most one timer per
//! widget is ever live.

use std::time::{Duration, Instant};

use carbon_box_core::logging::{report, targets};
use carbon_box_core::{TimerId, TimerManager};

use crate::error::CarbonError;
use crate::model::EntryModel;

/// Incremental prefix search state.
#[derive(Debug, Clone)]
pub struct TypeAhead {
    buffer: String,
    delay: Duration,
    timer: Option<TimerId>,
}

impl TypeAhead {
    /// Create an empty search with the given expiry delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            buffer: String::new(),
            delay,
            timer: None,
        }
    }

    /// The accumulated, lower-cased search text.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The expiry delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The pending expiry timer, if any.
    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Feed one character and return the first enabled entry matching the
    /// buffer.
    ///
    /// A buffer whose timer is due at `now` is discarded before the
    /// character is appended. The character is kept even when nothing
    /// matches; only expiry empties the buffer.
    pub fn type_character(
        &mut self,
        model: &EntryModel,
        ch: char,
        now: Instant,
        timers: &mut TimerManager,
    ) -> Option<usize> {
        let due = self
            .cancel_timer(timers)
            .is_some_and(|at| at.is_none_or(|at| at <= now));
        if due {
            self.buffer.clear();
        }

        self.buffer.extend(ch.to_lowercase());
        self.timer = Some(timers.start_one_shot(now, self.delay));

        let found = model
            .iter()
            .find(|e| e.is_enabled() && e.label_starts_with(&self.buffer))
            .map(|e| e.index);

        tracing::debug!(
            target: targets::SEARCH,
            buffer = %self.buffer,
            ?found,
            "type-ahead"
        );
        found
    }

    /// Clear the buffer if its timer is among `fired`.
    ///
    /// Returns `true` if the buffer expired.
    pub fn handle_timers(&mut self, fired: &[TimerId]) -> bool {
        match self.timer {
            Some(id) if fired.contains(&id) => {
                self.timer = None;
                self.buffer.clear();
                tracing::trace!(target: targets::SEARCH, "type-ahead buffer expired");
                true
            }
            _ => false,
        }
    }

    /// Cancel any pending timer and empty the buffer.
    pub fn reset(&mut self, timers: &mut TimerManager) {
        self.cancel_timer(timers);
        self.buffer.clear();
    }

    /// Stop the pending timer.
    ///
    /// Returns `None` when no timer was pending, otherwise the instant it
    /// would have fired. A timer that fired without being passed to
    /// [`handle_timers`](Self::handle_timers) yields `Some(None)` and is
    /// reported as a stale id.
    fn cancel_timer(&mut self, timers: &mut TimerManager) -> Option<Option<Instant>> {
        let id = self.timer.take()?;
        let fire_time = timers.fire_time(id);
        if let Err(err) = timers.stop(id) {
            report(&CarbonError::from(err));
        }
        Some(fire_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SourceNode, SourceOption};

    const DELAY: Duration = Duration::from_millis(300);

    fn colors() -> EntryModel {
        EntryModel::build(&[
            SourceNode::option("Red"),
            SourceNode::option("Green"),
            SourceNode::option("Blue"),
        ])
    }

    #[test]
    fn test_prefix_accumulates() {
        let model = colors();
        let mut timers = TimerManager::new();
        let mut search = TypeAhead::new(DELAY);
        let t0 = Instant::now();

        assert_eq!(search.type_character(&model, 'g', t0, &mut timers), Some(1));
        let t1 = t0 + Duration::from_millis(100);
        assert_eq!(search.type_character(&model, 'R', t1, &mut timers), Some(1));
        assert_eq!(search.buffer(), "gr");
        assert_eq!(timers.active_count(), 1);
    }

    #[test]
    fn test_buffer_resets_after_delay() {
        let model = colors();
        let mut timers = TimerManager::new();
        let mut search = TypeAhead::new(DELAY);
        let t0 = Instant::now();

        search.type_character(&model, 'g', t0, &mut timers);
        search.type_character(&model, 'r', t0 + Duration::from_millis(50), &mut timers);

        let later = t0 + Duration::from_millis(50) + DELAY + Duration::from_millis(1);
        assert_eq!(search.type_character(&model, 'b', later, &mut timers), Some(2));
        assert_eq!(search.buffer(), "b");
    }

    #[test]
    fn test_expiry_via_timer_processing() {
        let model = colors();
        let mut timers = TimerManager::new();
        let mut search = TypeAhead::new(DELAY);
        let t0 = Instant::now();

        search.type_character(&model, 'r', t0, &mut timers);
        let fired = timers.process_expired(t0 + DELAY);
        assert!(search.handle_timers(&fired));
        assert_eq!(search.buffer(), "");
        assert!(search.timer().is_none());
    }

    #[test]
    fn test_no_match_keeps_buffer_and_rearms() {
        let model = colors();
        let mut timers = TimerManager::new();
        let mut search = TypeAhead::new(DELAY);
        let t0 = Instant::now();

        search.type_character(&model, 'b', t0, &mut timers);
        let first_timer = search.timer();
        let t1 = t0 + Duration::from_millis(200);
        assert_eq!(search.type_character(&model, 'x', t1, &mut timers), None);
        assert_eq!(search.buffer(), "bx");
        assert_ne!(search.timer(), first_timer);
        assert_eq!(timers.fire_time(search.timer().unwrap()), Some(t1 + DELAY));
    }

    #[test]
    fn test_disabled_entries_never_match() {
        let model = EntryModel::build(&[
            SourceNode::Option(SourceOption::new("Berry").disabled()),
            SourceNode::option("Blue"),
        ]);
        let mut timers = TimerManager::new();
        let mut search = TypeAhead::new(DELAY);

        assert_eq!(
            search.type_character(&model, 'b', Instant::now(), &mut timers),
            Some(1)
        );
    }

    #[test]
    fn test_fired_but_unhandled_timer_starts_fresh_buffer() {
        let model = colors();
        let mut timers = TimerManager::new();
        let mut search = TypeAhead::new(DELAY);
        let t0 = Instant::now();

        search.type_character(&model, 'g', t0, &mut timers);
        // The owner drains the manager but never forwards the fired ids.
        let later = t0 + DELAY;
        assert_eq!(timers.process_expired(later).len(), 1);

        assert_eq!(search.type_character(&model, 'b', later, &mut timers), Some(2));
        assert_eq!(search.buffer(), "b");
        assert_eq!(timers.active_count(), 1);
        assert!(timers.is_active(search.timer().unwrap()));
    }

    #[test]
    fn test_reset_cancels_timer() {
        let model = colors();
        let mut timers = TimerManager::new();
        let mut search = TypeAhead::new(DELAY);

        search.type_character(&model, 'g', Instant::now(), &mut timers);
        search.reset(&mut timers);
        assert_eq!(search.buffer(), "");
        assert_eq!(timers.active_count(), 0);
    }
}
