//! Error types for the engine
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and registry operations ([`Error`]).
//!
//! ## Example
//!
//! ```
//! use pulse_input::{Builder, BuilderError};
//!
//! // No channels declared
//! let result = Builder::new().inputs(2).events(1).modes(2).build();
//! assert!(matches!(result, Err(BuilderError::ZeroCapacity { registry: "channels" })));
//! ```

use core::fmt;

use crate::id::Mode;

/// Which registry an invalid id was aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdKind {
    Input,
    Channel,
    Event,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IdKind::Input => "input",
            IdKind::Channel => "channel",
            IdKind::Event => "event",
        })
    }
}

/// Errors returned by registration and accessor operations
///
/// The matching procedure itself never fails; anything that reaches it has
/// already passed these checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Id outside the registry's declared capacity
    InvalidId {
        /// Registry the id was aimed at
        kind: IdKind,
        /// Raw id value
        id: u16,
        /// Declared capacity of that registry
        capacity: usize,
    },
    /// A required field is absent or malformed
    ///
    /// Carries a short description of the offending field.
    InvalidArgument(&'static str),
    /// Bulk registration larger than the registry
    CapacityExceeded {
        /// Number of entries supplied
        requested: usize,
        /// Declared capacity of the registry
        capacity: usize,
    },
    /// Mode 0, a mode outside the installed map, or no map installed
    InvalidMode(Mode),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidId { kind, id, capacity } => {
                write!(f, "Invalid {kind} id {id} (capacity {capacity})")
            }
            Error::InvalidArgument(what) => write!(f, "Invalid argument: {what}"),
            Error::CapacityExceeded {
                requested,
                capacity,
            } => write!(
                f,
                "Capacity exceeded: {requested} entries for {capacity} slots"
            ),
            Error::InvalidMode(mode) => write!(f, "Invalid behavior mode {}", mode.get()),
        }
    }
}

impl core::error::Error for Error {}

/// Errors that can occur when building configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// A registry was declared with no slots
    ZeroCapacity {
        /// Name of the registry
        registry: &'static str,
    },
    /// The state log must hold at least one entry
    ZeroLogDepth,
    /// The poll cadence must be at least one millisecond
    ZeroPollPeriod,
    /// More slots than the id type can address
    TooManyIds {
        /// Name of the registry
        registry: &'static str,
        /// Requested slot count
        requested: usize,
        /// Largest addressable slot count
        max: usize,
    },
}

impl fmt::Display for BuilderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderError::ZeroCapacity { registry } => {
                write!(f, "Capacity for {registry} must be specified")
            }
            BuilderError::ZeroLogDepth => write!(f, "State log depth must be at least 1"),
            BuilderError::ZeroPollPeriod => write!(f, "Poll period must be at least 1 ms"),
            BuilderError::TooManyIds {
                registry,
                requested,
                max,
            } => write!(f, "Too many {registry}: {requested} (max {max})"),
        }
    }
}

impl core::error::Error for BuilderError {}
