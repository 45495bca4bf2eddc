//! Cross-context control requests.
//!
//! The engine is only ever mutated from the poll context. Code running
//! elsewhere, an interrupt handler flipping the UI mode for instance, posts a
//! [`Control`] into a [`ControlQueue`] instead; [`Engine::apply_controls`]
//! drains it between ticks so a mode change is never observed half-applied.
//!
//! ```rust,ignore
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use pulse_input::{Control, ControlQueue, Mode};
//!
//! static CONTROLS: ControlQueue<CriticalSectionRawMutex, 4> = ControlQueue::new();
//!
//! // lid-closed interrupt
//! let _ = CONTROLS.try_push(Control::SetBehaviorMode(Mode::new(2)));
//!
//! // poll task
//! engine.apply_controls(&CONTROLS);
//! engine.poll(now_ms);
//! ```
//!
//! [`Engine::apply_controls`]: crate::Engine::apply_controls

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, TrySendError};

use crate::id::{ChannelId, InputId, Mode};

/// A deferred engine mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    SetBehaviorMode(Mode),
    SetInputEnabled(InputId, bool),
    SetChannelEnabled(ChannelId, bool),
    /// Clear a channel's history and debounce counters
    ResetChannel(ChannelId),
}

/// Bounded queue of [`Control`]s into the poll context.
///
/// ## Type Parameters
///
/// * `M` - Mutex guarding the queue; `CriticalSectionRawMutex` when producers
///   run in interrupt context, `NoopRawMutex` when everything shares one thread
/// * `N` - Queue depth
pub struct ControlQueue<M: RawMutex, const N: usize> {
    channel: Channel<M, Control, N>,
}

impl<M: RawMutex, const N: usize> ControlQueue<M, N> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Queue a request. Returns it back if the queue is full.
    pub fn try_push(&self, control: Control) -> Result<(), Control> {
        self.channel.try_send(control).map_err(|e| match e {
            TrySendError::Full(control) => control,
        })
    }

    pub(crate) fn try_pop(&self) -> Option<Control> {
        self.channel.try_receive().ok()
    }

    /// Requests waiting to be applied.
    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl<M: RawMutex, const N: usize> Default for ControlQueue<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
