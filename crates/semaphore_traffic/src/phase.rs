//! # Traffic-Light Phase
//!
//! The two-valued state published by a [`crate::PhaseCycler`].

use serde::Deserialize;
use std::fmt;
use std::time::Instant;

/// Traffic-light phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Phase {
    /// Stop.
    #[default]
    Red = 0,
    /// Go.
    Green = 1,
}

impl Phase {
    /// Returns the other phase.
    #[inline]
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Red => Self::Green,
            Self::Green => Self::Red,
        }
    }

    /// Converts from the `u8` stored in the cycler's atomic.
    ///
    /// Any non-zero value maps to `Green`.
    #[inline]
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Red,
            _ => Self::Green,
        }
    }

    /// Returns true for [`Phase::Green`].
    #[inline]
    #[must_use]
    pub const fn is_green(self) -> bool {
        matches!(self, Self::Green)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => f.write_str("red"),
            Self::Green => f.write_str("green"),
        }
    }
}

/// A published transition, delivered to every subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseChange {
    /// The phase that was entered.
    pub phase: Phase,
    /// 1-based transition index.
    pub generation: u64,
    /// When the toggle happened on the cycler thread.
    pub at: Instant,
}
