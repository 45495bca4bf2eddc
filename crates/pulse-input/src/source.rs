//! Physical input capability
//!
//! This module provides the [`InputSource`] trait the engine polls, and the
//! [`PinSource`] adapter for embedded-hal GPIO inputs.
//!
//! ## Example
//!
//! ```rust,ignore
//! use pulse_input::{Input, PinSource, Polarity};
//!
//! // Button to ground with a pull-up: pressed reads low
//! let confirm = PinSource::new(gpio3, Polarity::ActiveLow);
//! let input = Input::new(&confirm);
//! ```

use core::cell::{Cell, RefCell};
use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::InputPin;

/// A boolean signal the engine can sample.
///
/// Called synchronously from the poll tick, so implementations must be fast
/// and must not block.
pub trait InputSource {
    /// Whether the signal is currently asserted.
    fn is_active(&self) -> bool;
}

impl<F> InputSource for F
where
    F: Fn() -> bool,
{
    fn is_active(&self) -> bool {
        self()
    }
}

impl InputSource for Cell<bool> {
    fn is_active(&self) -> bool {
        self.get()
    }
}

/// Lets an interrupt handler latch a level for the poll context.
impl InputSource for AtomicBool {
    fn is_active(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

/// Electrical level that counts as "active".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Polarity {
    /// Active when the pin reads high
    #[default]
    ActiveHigh,
    /// Active when the pin reads low (button to ground with pull-up)
    ActiveLow,
}

/// [`InputSource`] over an embedded-hal [`InputPin`].
///
/// ## Type Parameters
///
/// * `P` - GPIO input implementing [`InputPin`]
pub struct PinSource<P> {
    /// embedded-hal reads take `&mut self`; the engine polls through `&self`
    pin: RefCell<P>,
    polarity: Polarity,
}

impl<P> PinSource<P>
where
    P: InputPin,
{
    pub fn new(pin: P, polarity: Polarity) -> Self {
        Self {
            pin: RefCell::new(pin),
            polarity,
        }
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.pin.into_inner()
    }
}

impl<P> InputSource for PinSource<P>
where
    P: InputPin,
{
    fn is_active(&self) -> bool {
        let Ok(mut pin) = self.pin.try_borrow_mut() else {
            log::warn!("pin source polled re-entrantly, reporting inactive");
            return false;
        };
        let level = match self.polarity {
            Polarity::ActiveHigh => pin.is_high(),
            Polarity::ActiveLow => pin.is_low(),
        };
        match level {
            Ok(active) => active,
            Err(e) => {
                log::warn!("pin read failed: {e:?}");
                false
            }
        }
    }
}
