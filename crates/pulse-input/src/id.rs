//! Dense registry indices.
//!
//! Every registry is an arena of fixed-capacity slots. These newtypes keep
//! an input index from being used where a channel index is expected.

use core::fmt;

macro_rules! dense_id {
    ($(#[$meta:meta])* $name:ident($repr:ty), $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name($repr);

        impl $name {
            /// Wrap a raw index.
            pub const fn new(raw: $repr) -> Self {
                Self(raw)
            }

            /// The raw index.
            pub const fn get(self) -> $repr {
                self.0
            }

            /// The index as a slot offset.
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<$repr> for $name {
            fn from(raw: $repr) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for $repr {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

dense_id!(
    /// Index into the input registry.
    InputId(u16),
    "input#"
);

dense_id!(
    /// Index into the input channel registry.
    ChannelId(u16),
    "channel#"
);

dense_id!(
    /// Index into the event definition registry.
    EventId(u16),
    "event#"
);

dense_id!(
    /// Behavior mode. Mode 0 is reserved as "none".
    Mode(u8),
    "mode#"
);

impl Mode {
    /// The reserved mode installed by [`Engine::set_behavior_map`](crate::Engine::set_behavior_map).
    pub const NONE: Mode = Mode(0);

    /// Whether this is the reserved "none" mode.
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}
