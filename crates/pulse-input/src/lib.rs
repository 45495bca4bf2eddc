//! Pattern-based input event recognition for polled embedded UIs.
//!
//! `pulse-input` turns raw boolean signals (buttons, switches, sensor lines)
//! into named semantic events such as "long press" or "double tap". Each
//! [`InputChannel`] ANDs one or more [`Input`]s into a single level, keeps a
//! short newest-first log of its level changes, and on every poll tick
//! matches that log against the [`EventDefinition`]s enabled for the current
//! behavior [`Mode`].
//!
//! ## Architecture
//!
//! ```text
//!  InputSource ──► Input ──┐
//!  InputSource ──► Input ──┼─► InputChannel ──► StateLog ──► matcher ──► EventHandler
//!                          │        ▲                          ▲
//!                                   │                          │
//!                          BehaviorMap[mode][channel][event]   EventDefinition
//! ```
//!
//! The engine runs to completion inside [`Engine::poll`] and never blocks.
//! An external scheduler calls it at [`Config::poll_period_ms`].
//!
//! ## Example
//!
//! ```
//! use core::cell::{Cell, RefCell};
//! use pulse_input::{
//!     BehaviorMap, Builder, ChannelId, Engine, EventDefinition, EventId, Input,
//!     InputChannel, InputId, Mode, SemanticEvent, StateStep,
//! };
//!
//! static HOLD: [StateStep; 1] = [StateStep::active(40, 0)];
//! static SOURCES: [InputId; 1] = [InputId::new(0)];
//!
//! let button = Cell::new(false);
//! let fired = RefCell::new(Vec::new());
//! let handler = |event: SemanticEvent| fired.borrow_mut().push(event);
//!
//! let config = Builder::new()
//!     .inputs(1)
//!     .channels(1)
//!     .events(1)
//!     .modes(2)
//!     .build()
//!     .unwrap();
//! let mut engine = Engine::new(config);
//! engine.add_input(InputId::new(0), Input::new(&button)).unwrap();
//! engine
//!     .add_event_definition(EventId::new(0), EventDefinition::new(&HOLD))
//!     .unwrap();
//! engine
//!     .add_input_channel(ChannelId::new(0), InputChannel::new(&SOURCES, &handler))
//!     .unwrap();
//!
//! let mut map = BehaviorMap::new(2, 1, 1);
//! map.enable_all(Mode::new(1));
//! engine.set_behavior_map(map).unwrap();
//! engine.set_behavior_mode(Mode::new(1)).unwrap();
//!
//! button.set(true);
//! for now in (0..=50).step_by(10) {
//!     engine.poll(now);
//! }
//! assert_eq!(fired.borrow().len(), 1);
//! assert_eq!(fired.borrow()[0].timestamp_ms, 40);
//! ```
//!
//! ## Validation
//!
//! With the default `checked` feature every registration and accessor
//! validates ids and arguments and returns an [`Error`]. Without it those
//! checks compile away; an out-of-range id then panics when indexing, and a
//! bulk registration longer than its registry keeps only the entries that fit.
//!
//! ## Timestamps
//!
//! Time is a `u32` millisecond counter supplied by the caller. Durations are
//! computed with wrapping subtraction, so a single counter wrap (about 49.7
//! days) is tolerated as long as no held duration reaches 2^32 ms. The wrap
//! count itself is not tracked.

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::unreachable,
        clippy::unwrap_used
    )
)]

extern crate alloc;

mod check;

pub mod behavior;
pub mod config;
pub mod control;
pub mod engine;
pub mod error;
pub mod handler;
pub mod id;
pub mod pattern;
pub mod registry;
pub mod source;
pub mod state_log;

pub use behavior::BehaviorMap;
pub use config::{Builder, Config};
pub use control::{Control, ControlQueue};
pub use engine::Engine;
pub use error::{BuilderError, Error, IdKind};
pub use handler::{EventHandler, SemanticEvent};
pub use id::{ChannelId, EventId, InputId, Mode};
pub use pattern::{EventDefinition, StateStep};
pub use registry::{Input, InputChannel};
pub use source::{InputSource, PinSource, Polarity};
pub use state_log::{StateLog, StateLogEntry};

/// Poll cadence of the reference scheduler, in milliseconds.
pub const DEFAULT_POLL_PERIOD_MS: u32 = 10;

/// Default number of level changes remembered per channel.
pub const DEFAULT_LOG_DEPTH: usize = 8;
