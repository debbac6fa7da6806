//! Error types for the MicroW link
//!
//! All errors are `no_std` friendly: plain enums carrying just enough context
//! to log, without heap allocation. Transient "nothing to do yet" outcomes are
//! not errors and live in the codec result types instead.

use core::fmt;

use crate::types::RingKind;

/// Failure reported by an external peripheral driver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeripheralError {
    /// Analog-to-digital converter fault
    Adc,
    /// Digital-to-analog converter fault
    Dac,
    /// Serial transport fault
    Uart,
    /// Tick timer fault
    Timer,
    /// Driver cannot accept the request right now
    Busy,
}

impl fmt::Display for PeripheralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adc => write!(f, "ADC fault"),
            Self::Dac => write!(f, "DAC fault"),
            Self::Uart => write!(f, "UART fault"),
            Self::Timer => write!(f, "timer fault"),
            Self::Busy => write!(f, "peripheral busy"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PeripheralError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Adc => defmt::write!(f, "ADC"),
            Self::Dac => defmt::write!(f, "DAC"),
            Self::Uart => defmt::write!(f, "UART"),
            Self::Timer => defmt::write!(f, "TIMER"),
            Self::Busy => defmt::write!(f, "BUSY"),
        }
    }
}

/// Errors raised by the rings, the codec and the link sessions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkError {
    /// Bit ring cannot hold a sync marker plus one word
    Configuration {
        /// Bit ring capacity that was offered, in bytes
        bit_ring: usize,
        /// Minimum capacity required, in bytes
        required: usize,
    },
    /// Ring storage could not be reserved
    Allocation {
        /// Capacity requested
        requested: usize,
        /// Storage actually available
        available: usize,
    },
    /// Producer would overwrite data the consumer has not read yet
    Overrun {
        /// Ring that overflowed
        ring: RingKind,
    },
    /// Error propagated unchanged from a peripheral
    Peripheral(PeripheralError),
    /// Restart or update requested before start
    NotStarted,
    /// Update requested on a stopped stream
    Inactive,
}

impl LinkError {
    /// Overrun on the given ring
    #[must_use]
    pub const fn overrun(ring: RingKind) -> Self {
        Self::Overrun { ring }
    }

    /// Check if this error is an overrun (data dropped, state consistent)
    #[must_use]
    pub const fn is_overrun(&self) -> bool {
        matches!(self, Self::Overrun { .. })
    }
}

impl From<PeripheralError> for LinkError {
    fn from(err: PeripheralError) -> Self {
        Self::Peripheral(err)
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { bit_ring, required } => {
                write!(f, "bit ring of {bit_ring} bytes is too small, need {required}")
            }
            Self::Allocation {
                requested,
                available,
            } => write!(f, "cannot reserve {requested} slots, only {available} available"),
            Self::Overrun { ring: RingKind::Sample } => write!(f, "sample ring overrun"),
            Self::Overrun { ring: RingKind::Bit } => write!(f, "bit ring overrun"),
            Self::Peripheral(err) => write!(f, "peripheral error: {err}"),
            Self::NotStarted => write!(f, "stream not started"),
            Self::Inactive => write!(f, "stream inactive"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LinkError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Configuration { bit_ring, required } => {
                defmt::write!(f, "Config: bit ring {}B < {}B", bit_ring, required);
            }
            Self::Allocation {
                requested,
                available,
            } => defmt::write!(f, "Alloc: {} > {}", requested, available),
            Self::Overrun { ring } => defmt::write!(f, "Overrun({})", ring),
            Self::Peripheral(err) => defmt::write!(f, "Periph({})", err),
            Self::NotStarted => defmt::write!(f, "NotStarted"),
            Self::Inactive => defmt::write!(f, "Inactive"),
        }
    }
}

/// Result alias used throughout the link core
pub type LinkResult<T> = Result<T, LinkError>;
