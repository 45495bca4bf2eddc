//! Engine configuration types and builder

pub use crate::error::BuilderError;
use crate::{DEFAULT_LOG_DEPTH, DEFAULT_POLL_PERIOD_MS};

/// Engine configuration
///
/// Fixes the size of every registry and of each channel's state log.
/// All memory is reserved from these numbers in [`Engine::new`](crate::Engine::new).
/// Use `Builder` to create a Config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    inputs: usize,
    channels: usize,
    events: usize,
    modes: usize,
    log_depth: usize,
    poll_period_ms: u32,
}

impl Config {
    /// Input registry capacity
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    /// Channel registry capacity
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Event definition registry capacity
    pub fn events(&self) -> usize {
        self.events
    }

    /// Number of behavior modes, including the reserved mode 0
    pub fn modes(&self) -> usize {
        self.modes
    }

    /// Level changes remembered per channel
    pub fn log_depth(&self) -> usize {
        self.log_depth
    }

    /// Cadence the scheduler should call [`Engine::poll`](crate::Engine::poll) at
    pub fn poll_period_ms(&self) -> u32 {
        self.poll_period_ms
    }
}

/// Builder for constructing engine configuration
///
/// # Example
///
/// ```
/// use pulse_input::Builder;
///
/// let config = Builder::new()
///     .inputs(3)
///     .channels(2)
///     .events(4)
///     .modes(3)
///     .log_depth(6)
///     .build()
///     .expect("valid configuration");
/// assert_eq!(config.poll_period_ms(), 10);
/// ```
pub struct Builder {
    inputs: usize,
    channels: usize,
    events: usize,
    modes: usize,
    log_depth: usize,
    poll_period_ms: u32,
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            inputs: 0,
            channels: 0,
            events: 0,
            // Mode 0 plus one usable mode
            modes: 2,
            log_depth: DEFAULT_LOG_DEPTH,
            poll_period_ms: DEFAULT_POLL_PERIOD_MS,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set input registry capacity (required)
    pub fn inputs(mut self, count: usize) -> Self {
        self.inputs = count;
        self
    }

    /// Set channel registry capacity (required)
    pub fn channels(mut self, count: usize) -> Self {
        self.channels = count;
        self
    }

    /// Set event definition registry capacity (required)
    pub fn events(mut self, count: usize) -> Self {
        self.events = count;
        self
    }

    /// Set number of behavior modes, counting the reserved mode 0
    pub fn modes(mut self, count: usize) -> Self {
        self.modes = count;
        self
    }

    /// Set state log depth
    pub fn log_depth(mut self, depth: usize) -> Self {
        self.log_depth = depth;
        self
    }

    /// Set poll cadence
    pub fn poll_period_ms(mut self, period: u32) -> Self {
        self.poll_period_ms = period;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// - `BuilderError::ZeroCapacity` if a registry has no slots
    /// - `BuilderError::TooManyIds` if a registry outgrows its id type
    /// - `BuilderError::ZeroLogDepth` / `BuilderError::ZeroPollPeriod`
    pub fn build(self) -> Result<Config, BuilderError> {
        let id_limit = u16::MAX as usize + 1;
        for (registry, count, max) in [
            ("inputs", self.inputs, id_limit),
            ("channels", self.channels, id_limit),
            ("events", self.events, id_limit),
            ("modes", self.modes, u8::MAX as usize + 1),
        ] {
            if count == 0 {
                return Err(BuilderError::ZeroCapacity { registry });
            }
            if count > max {
                return Err(BuilderError::TooManyIds {
                    registry,
                    requested: count,
                    max,
                });
            }
        }
        if self.log_depth == 0 {
            return Err(BuilderError::ZeroLogDepth);
        }
        if self.poll_period_ms == 0 {
            return Err(BuilderError::ZeroPollPeriod);
        }

        Ok(Config {
            inputs: self.inputs,
            channels: self.channels,
            events: self.events,
            modes: self.modes,
            log_depth: self.log_depth,
            poll_period_ms: self.poll_period_ms,
        })
    }
}
