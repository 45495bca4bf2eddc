//! Output boundary of the engine.

use crate::id::{ChannelId, EventId};

/// A recognized event, delivered to the channel's [`EventHandler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SemanticEvent {
    /// Definition that matched
    pub event: EventId,
    /// Channel whose history matched it
    pub channel: ChannelId,
    /// Tick time of the match
    pub timestamp_ms: u32,
}

/// Consumer of recognized events, typically the menu or application layer.
///
/// Invoked synchronously from inside [`Engine::poll`](crate::Engine::poll);
/// it must return quickly and must not block.
pub trait EventHandler {
    fn on_event(&self, event: SemanticEvent);
}

impl<F> EventHandler for F
where
    F: Fn(SemanticEvent),
{
    fn on_event(&self, event: SemanticEvent) {
        self(event)
    }
}
