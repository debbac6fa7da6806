//! Shared types used across the MicroW link
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;

use crate::config::WORD_BITS;

/// One analog sample carried by the protocol
///
/// The value is always masked to [`WORD_BITS`] bits, so a `Word` can never
/// hold a value the wire format cannot represent.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Word(u16);

impl Word {
    /// Bit mask covering the valid word range
    pub const MASK: u16 = if WORD_BITS >= 16 {
        u16::MAX
    } else {
        (1u16 << WORD_BITS) - 1
    };

    /// Largest representable word
    pub const MAX: Self = Self(Self::MASK);

    /// Zero word
    pub const ZERO: Self = Self(0);

    /// Mid-scale word (0 V with bias on a unipolar converter)
    pub const MID: Self = Self(1u16 << (WORD_BITS - 1));

    /// Create a word, discarding bits above [`WORD_BITS`]
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw & Self::MASK)
    }

    /// Create a word, returns None if the value does not fit
    #[must_use]
    pub const fn from_raw(raw: u16) -> Option<Self> {
        if raw & !Self::MASK == 0 {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Get the raw value
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Bit at MSB-first position `index` (0 = most significant)
    #[must_use]
    pub const fn bit_msb_first(self, index: u8) -> bool {
        (self.0 >> (WORD_BITS - 1 - index)) & 1 == 1
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word(0x{:03X})", self.0)
    }
}

impl From<Word> for u16 {
    fn from(word: Word) -> Self {
        word.0
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Word {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "0x{:03X}", self.0);
    }
}

/// State of a ring buffer as seen by its producer and consumer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StreamState {
    /// Ready for data flow
    Active,
    /// Not in use, no data flow
    #[default]
    Inactive,
    /// A transfer with a peripheral is in flight
    Busy,
}

#[cfg(feature = "embedded")]
impl defmt::Format for StreamState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Active => defmt::write!(f, "ACTIVE"),
            Self::Inactive => defmt::write!(f, "INACTIVE"),
            Self::Busy => defmt::write!(f, "BUSY"),
        }
    }
}

/// Which of the two rings an event refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingKind {
    /// Word ring between the analog side and the codec
    Sample,
    /// Byte ring between the codec and the serial side
    Bit,
}

#[cfg(feature = "embedded")]
impl defmt::Format for RingKind {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Sample => defmt::write!(f, "sample"),
            Self::Bit => defmt::write!(f, "bit"),
        }
    }
}

/// Operating mode of a link endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkMode {
    /// Analog input -> encoder -> serial transmit
    Emitter,
    /// Serial receive -> decoder -> analog output
    Receiver,
}

#[cfg(feature = "embedded")]
impl defmt::Format for LinkMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Emitter => defmt::write!(f, "EMITTER"),
            Self::Receiver => defmt::write!(f, "RECEIVER"),
        }
    }
}

/// Reaction to a failure reported by the active session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Swallow the error and keep running
    Ignore,
    /// Stop the session and stay stopped
    Stop,
    /// Stop and start again with the same peripherals
    #[default]
    Restart,
    /// Enter a non-recovering wait state
    Halt,
}

#[cfg(feature = "embedded")]
impl defmt::Format for ErrorPolicy {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Ignore => defmt::write!(f, "IGNORE"),
            Self::Stop => defmt::write!(f, "STOP"),
            Self::Restart => defmt::write!(f, "RESTART"),
            Self::Halt => defmt::write!(f, "HALT"),
        }
    }
}
