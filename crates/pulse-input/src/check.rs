//! Argument validation, compiled in with the `checked` feature.
//!
//! Without the feature every check here is `Ok(())` and the caller is
//! trusted. Nothing outside this module looks at the feature flag.

use crate::error::{Error, IdKind};
use crate::id::Mode;

#[cfg(feature = "checked")]
mod imp {
    use super::*;

    #[inline]
    pub(crate) fn id(kind: IdKind, id: u16, capacity: usize) -> Result<(), Error> {
        if (id as usize) < capacity {
            Ok(())
        } else {
            Err(Error::InvalidId { kind, id, capacity })
        }
    }

    #[inline]
    pub(crate) fn capacity(requested: usize, capacity: usize) -> Result<(), Error> {
        if requested <= capacity {
            Ok(())
        } else {
            Err(Error::CapacityExceeded {
                requested,
                capacity,
            })
        }
    }

    #[inline]
    pub(crate) fn argument(valid: bool, what: &'static str) -> Result<(), Error> {
        if valid {
            Ok(())
        } else {
            Err(Error::InvalidArgument(what))
        }
    }

    #[inline]
    pub(crate) fn mode(mode: Mode, modes: usize) -> Result<(), Error> {
        if !mode.is_none() && mode.index() < modes {
            Ok(())
        } else {
            Err(Error::InvalidMode(mode))
        }
    }
}

#[cfg(not(feature = "checked"))]
mod imp {
    use super::*;

    #[inline(always)]
    pub(crate) fn id(_kind: IdKind, _id: u16, _capacity: usize) -> Result<(), Error> {
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn capacity(_requested: usize, _capacity: usize) -> Result<(), Error> {
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn argument(_valid: bool, _what: &'static str) -> Result<(), Error> {
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn mode(_mode: Mode, _modes: usize) -> Result<(), Error> {
        Ok(())
    }
}

pub(crate) use imp::{argument, capacity, id, mode};

/// Whether validation is compiled in.
pub(crate) const ENABLED: bool = cfg!(feature = "checked");
