//! Temporal patterns and the backward matcher.
//!
//! A pattern is authored oldest-first, the way a gesture is described
//! ("released, then pressed for at most 300 ms, then released again"), and
//! matched newest-first against a channel's [`StateLog`].

use crate::state_log::StateLog;

/// One held level inside a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateStep {
    /// Level the channel must be at
    pub level: bool,
    /// Shortest time the level must be held
    pub min_duration_ms: u32,
    /// Longest time the level may be held, 0 for unbounded
    ///
    /// Not applied to the newest step, whose hold is still in progress.
    pub max_duration_ms: u32,
}

impl StateStep {
    pub const fn new(level: bool, min_duration_ms: u32, max_duration_ms: u32) -> Self {
        Self {
            level,
            min_duration_ms,
            max_duration_ms,
        }
    }

    /// Channel active for `min..=max` ms.
    pub const fn active(min_duration_ms: u32, max_duration_ms: u32) -> Self {
        Self::new(true, min_duration_ms, max_duration_ms)
    }

    /// Channel inactive for `min..=max` ms.
    pub const fn inactive(min_duration_ms: u32, max_duration_ms: u32) -> Self {
        Self::new(false, min_duration_ms, max_duration_ms)
    }

    fn accepts_hold(&self, held_ms: u32) -> bool {
        held_ms >= self.min_duration_ms
            && (self.max_duration_ms == 0 || held_ms <= self.max_duration_ms)
    }
}

/// A named temporal pattern.
///
/// The id it is registered under is its name as far as handlers are
/// concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventDefinition<'a> {
    steps: &'a [StateStep],
}

impl<'a> EventDefinition<'a> {
    pub const fn new(steps: &'a [StateStep]) -> Self {
        Self { steps }
    }

    /// Steps, oldest first.
    pub fn steps(&self) -> &'a [StateStep] {
        self.steps
    }

    /// Number of level changes needed before a match is possible.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Match this pattern against `log` at tick time `now_ms`.
    ///
    /// The last step is compared with the newest log entry and must already
    /// have been held for its minimum. Every older step is compared with the
    /// time its level was held before the following transition.
    pub fn matches(&self, log: &StateLog, now_ms: u32) -> bool {
        if self.steps.is_empty() || self.steps.len() > log.depth() {
            return false;
        }

        let mut newer_timestamp = now_ms;
        for (age, step) in self.steps.iter().rev().enumerate() {
            let Some(entry) = log.get(age) else {
                return false;
            };
            if entry.is_active != step.level {
                return false;
            }

            let held_ms = newer_timestamp.wrapping_sub(entry.timestamp_ms);
            let held_long_enough = if age == 0 {
                held_ms >= step.min_duration_ms
            } else {
                step.accepts_hold(held_ms)
            };
            if !held_long_enough {
                return false;
            }
            newer_timestamp = entry.timestamp_ms;
        }
        true
    }
}
