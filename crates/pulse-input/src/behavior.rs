//! Behavior mode matrix.
//!
//! `[mode][channel][event] -> enabled`. Switching modes swaps the whole set
//! of events the engine evaluates in one step, e.g. a menu screen listens for
//! clicks while a slider screen listens for holds.

use alloc::vec;
use alloc::vec::Vec;

use crate::id::{ChannelId, EventId, Mode};

/// Dense three-dimensional enable table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BehaviorMap {
    modes: usize,
    channels: usize,
    events: usize,
    cells: Vec<bool>,
}

impl BehaviorMap {
    /// A map with every event disabled in every mode.
    ///
    /// `modes` counts the reserved mode 0.
    pub fn new(modes: usize, channels: usize, events: usize) -> Self {
        Self {
            modes,
            channels,
            events,
            cells: vec![false; modes * channels * events],
        }
    }

    /// Build from a nested literal table, `rows[mode][channel][event]`.
    pub fn from_array<const M: usize, const C: usize, const E: usize>(
        rows: &[[[bool; E]; C]; M],
    ) -> Self {
        let mut cells = Vec::with_capacity(M * C * E);
        for mode in rows {
            for channel in mode {
                cells.extend_from_slice(channel);
            }
        }
        Self {
            modes: M,
            channels: C,
            events: E,
            cells,
        }
    }

    pub fn modes(&self) -> usize {
        self.modes
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn events(&self) -> usize {
        self.events
    }

    /// Whether `mode` is a selectable mode of this map.
    pub fn contains_mode(&self, mode: Mode) -> bool {
        !mode.is_none() && mode.index() < self.modes
    }

    fn offset(&self, mode: Mode, channel: ChannelId, event: EventId) -> Option<usize> {
        if mode.index() >= self.modes
            || channel.index() >= self.channels
            || event.index() >= self.events
        {
            return None;
        }
        Some((mode.index() * self.channels + channel.index()) * self.events + event.index())
    }

    /// Cell value; out-of-range coordinates read as disabled.
    pub fn get(&self, mode: Mode, channel: ChannelId, event: EventId) -> bool {
        self.offset(mode, channel, event)
            .is_some_and(|i| self.cells[i])
    }

    /// Set one cell. Out-of-range coordinates are ignored and return `false`.
    pub fn set(&mut self, mode: Mode, channel: ChannelId, event: EventId, enabled: bool) -> bool {
        match self.offset(mode, channel, event) {
            Some(i) => {
                self.cells[i] = enabled;
                true
            }
            None => false,
        }
    }

    /// Enable every event on every channel in `mode`.
    pub fn enable_all(&mut self, mode: Mode) {
        if mode.index() >= self.modes {
            return;
        }
        let row = self.channels * self.events;
        let start = mode.index() * row;
        self.cells[start..start + row].fill(true);
    }

    /// The `[event]` row for one channel in one mode.
    pub(crate) fn row(&self, mode: Mode, channel: ChannelId) -> &[bool] {
        let start = (mode.index() * self.channels + channel.index()) * self.events;
        self.cells.get(start..start + self.events).unwrap_or(&[])
    }
}
