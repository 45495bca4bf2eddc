//! Per-channel history of level changes.
//!
//! A fixed-size circular buffer addressed newest-first: index 0 is the most
//! recent transition. Pushing overwrites the oldest entry.

use alloc::vec;
use alloc::vec::Vec;

/// One level transition of a channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StateLogEntry {
    /// Tick time at which the new level was first observed
    pub timestamp_ms: u32,
    /// Composite level from that tick on
    pub is_active: bool,
}

/// Bounded newest-first log.
#[derive(Clone, Debug)]
pub struct StateLog {
    entries: Vec<StateLogEntry>,
    /// Slot holding the newest entry
    head: usize,
}

impl StateLog {
    /// Create a log of `depth` entries, all `{ 0 ms, inactive }`.
    pub fn new(depth: usize) -> Self {
        Self {
            entries: vec![StateLogEntry::default(); depth.max(1)],
            head: 0,
        }
    }

    /// Number of entries held.
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// The newest entry.
    pub fn newest(&self) -> StateLogEntry {
        self.entries[self.head]
    }

    /// Entry `age` transitions back, 0 being the newest.
    pub fn get(&self, age: usize) -> Option<StateLogEntry> {
        if age >= self.entries.len() {
            return None;
        }
        Some(self.entries[(self.head + age) % self.entries.len()])
    }

    /// Record a transition, dropping the oldest entry.
    pub fn push(&mut self, entry: StateLogEntry) {
        let len = self.entries.len();
        self.head = (self.head + len - 1) % len;
        self.entries[self.head] = entry;
    }

    /// Forget every transition.
    pub fn clear(&mut self) {
        self.entries.fill(StateLogEntry::default());
        self.head = 0;
    }

    /// Entries newest-first.
    pub fn iter(&self) -> impl Iterator<Item = StateLogEntry> + '_ {
        (0..self.entries.len()).filter_map(move |age| self.get(age))
    }
}
