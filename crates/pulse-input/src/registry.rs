//! Registration value objects and the per-slot runtime state behind them.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::handler::EventHandler;
use crate::id::InputId;
use crate::source::InputSource;
use crate::state_log::{StateLog, StateLogEntry};

/// A physical boolean source as registered with the engine.
#[derive(Clone, Copy)]
pub struct Input<'a> {
    pub(crate) source: &'a dyn InputSource,
    pub(crate) enabled: bool,
}

impl<'a> Input<'a> {
    /// Wrap a source, enabled.
    pub fn new(source: &'a dyn InputSource) -> Self {
        Self {
            source,
            enabled: true,
        }
    }

    /// Set the enable flag the input starts with.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl fmt::Debug for Input<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// A composite signal: the AND of its source inputs.
#[derive(Clone, Copy)]
pub struct InputChannel<'a> {
    pub(crate) sources: &'a [InputId],
    pub(crate) handler: &'a dyn EventHandler,
    pub(crate) enabled: bool,
}

impl<'a> InputChannel<'a> {
    /// Combine `sources` and route matches to `handler`. Starts enabled.
    pub fn new(sources: &'a [InputId], handler: &'a dyn EventHandler) -> Self {
        Self {
            sources,
            handler,
            enabled: true,
        }
    }

    /// Set the enable flag the channel starts with.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn sources(&self) -> &'a [InputId] {
        self.sources
    }
}

impl fmt::Debug for InputChannel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputChannel")
            .field("sources", &self.sources)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// Per (channel, event) gating and debounce state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct EventSlot {
    /// Copied from the behavior map on every mode change
    pub(crate) enabled: bool,
    /// Level changes since this event last fired or was reset
    pub(crate) events_since_handled: u32,
}

/// A registered channel with its history.
pub(crate) struct ChannelState<'a> {
    pub(crate) channel: InputChannel<'a>,
    pub(crate) enabled: bool,
    pub(crate) log: StateLog,
    pub(crate) slots: Vec<EventSlot>,
}

impl<'a> ChannelState<'a> {
    pub(crate) fn new(channel: InputChannel<'a>, log_depth: usize, events: usize) -> Self {
        Self {
            enabled: channel.enabled,
            channel,
            log: StateLog::new(log_depth),
            slots: vec![EventSlot::default(); events],
        }
    }

    /// Log a level change and bump every slot's counter.
    pub(crate) fn record_edge(&mut self, timestamp_ms: u32, is_active: bool) {
        self.log.push(StateLogEntry {
            timestamp_ms,
            is_active,
        });
        for slot in &mut self.slots {
            slot.events_since_handled = slot.events_since_handled.saturating_add(1);
        }
    }

    /// Clear history and counters, keeping slot enablement.
    pub(crate) fn reset(&mut self) {
        self.log.clear();
        for slot in &mut self.slots {
            slot.events_since_handled = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::SemanticEvent;

    #[test]
    fn edges_count_on_every_slot() {
        static SOURCES: [InputId; 1] = [InputId::new(0)];
        let handler = |_: SemanticEvent| {};
        let mut state = ChannelState::new(InputChannel::new(&SOURCES, &handler), 4, 3);
        state.slots[1].enabled = true;

        state.record_edge(10, true);
        state.record_edge(20, false);

        assert!(state.slots.iter().all(|s| s.events_since_handled == 2));
        assert_eq!(state.log.newest().timestamp_ms, 20);

        state.reset();
        assert!(state.slots.iter().all(|s| s.events_since_handled == 0));
        assert!(state.slots[1].enabled);
        assert_eq!(state.log.newest(), StateLogEntry::default());
    }

    #[test]
    fn channel_starts_with_requested_enable_flag() {
        static SOURCES: [InputId; 2] = [InputId::new(0), InputId::new(1)];
        let handler = |_: SemanticEvent| {};
        let state = ChannelState::new(
            InputChannel::new(&SOURCES, &handler).enabled(false),
            4,
            1,
        );
        assert!(!state.enabled);
        assert_eq!(state.channel.sources().len(), 2);
    }
}
