//! Stream Decoder
//!
//! Waits for a sync marker, then cuts `WORD_BITS`-wide windows out of the bit
//! ring and queues them as words. Bytes that arrive before the first marker
//! are thrown away.

use crate::config::{MIN_BIT_RING_CAPACITY, WORD_BITS};
use crate::error::{LinkError, LinkResult};
use crate::protocol::is_marker;
use crate::ring::{BitRing, SampleRing};
use crate::types::{StreamState, Word};

/// Outcome of one decoder update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decoded {
    /// The latest byte was a marker; the stream is aligned behind it
    Synchronized,
    /// No marker seen yet; unread bytes were discarded
    SyncWaiting,
    /// Aligned, but fewer than `WORD_BITS` bits are waiting
    NoData,
    /// This many words were queued in the sample ring
    Words(usize),
}

impl Decoded {
    /// Check if the update produced words for the analog output
    #[must_use]
    pub const fn word_ready(&self) -> bool {
        matches!(self, Self::Words(n) if *n > 0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Decoded {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Synchronized => defmt::write!(f, "Synchronized"),
            Self::SyncWaiting => defmt::write!(f, "SyncWaiting"),
            Self::NoData => defmt::write!(f, "NoData"),
            Self::Words(n) => defmt::write!(f, "Words({})", n),
        }
    }
}

/// Byte-to-word extractor with marker alignment
#[derive(Clone, Copy, Debug, Default)]
pub struct Decoder {
    started: bool,
}

impl Decoder {
    /// Create a decoder that has not been started
    #[must_use]
    pub const fn new() -> Self {
        Self { started: false }
    }

    /// Check if the decoder was started
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Bind to both rings and wait for the first marker
    ///
    /// # Errors
    ///
    /// [`LinkError::Configuration`] if the bit ring cannot hold a marker plus
    /// one word.
    pub fn start<const B: usize, const S: usize>(
        &mut self,
        bits: &mut BitRing<B>,
        samples: &mut SampleRing<S>,
    ) -> LinkResult<()> {
        if bits.capacity() < MIN_BIT_RING_CAPACITY {
            return Err(LinkError::Configuration {
                bit_ring: bits.capacity(),
                required: MIN_BIT_RING_CAPACITY,
            });
        }
        self.started = true;
        unsync(bits);
        bits.set_state(StreamState::Active);
        samples.set_state(StreamState::Active);
        Ok(())
    }

    /// Reactivate both rings and wait for a fresh marker
    ///
    /// # Errors
    ///
    /// [`LinkError::NotStarted`] without a prior `start`.
    pub fn restart<const B: usize, const S: usize>(
        &mut self,
        bits: &mut BitRing<B>,
        samples: &mut SampleRing<S>,
    ) -> LinkResult<()> {
        if !self.started {
            return Err(LinkError::NotStarted);
        }
        unsync(bits);
        bits.set_state(StreamState::Active);
        samples.set_state(StreamState::Active);
        Ok(())
    }

    /// Align on the latest marker or extract every complete word
    ///
    /// # Errors
    ///
    /// - [`LinkError::NotStarted`] / [`LinkError::Inactive`] if not running
    /// - [`LinkError::Overrun`] if the sample ring is full; the word that did
    ///   not fit is dropped and its bits stay consumed
    pub fn update<const B: usize, const S: usize>(
        &mut self,
        bits: &mut BitRing<B>,
        samples: &mut SampleRing<S>,
    ) -> LinkResult<Decoded> {
        if !self.started {
            return Err(LinkError::NotStarted);
        }
        if bits.is_inactive() || samples.is_inactive() {
            return Err(LinkError::Inactive);
        }

        if bits.latest().is_some_and(is_marker) {
            if !bits.is_synchronized() {
                debug!("decoder synchronized");
            }
            bits.set_synchronized(true);
            bits.realign();
            bits.mark_sync();
            return Ok(Decoded::Synchronized);
        }

        if !bits.is_synchronized() {
            bits.realign();
            return Ok(Decoded::SyncWaiting);
        }

        let mut words = 0;
        while let Some(raw) = bits.read_bits(WORD_BITS) {
            samples.push(Word::new(raw))?;
            words += 1;
        }

        if words == 0 {
            return Ok(Decoded::NoData);
        }
        trace!("decoded {=usize} words", words);
        Ok(Decoded::Words(words))
    }

    /// Mark both rings inactive and drop synchronization
    pub fn stop<const B: usize, const S: usize>(
        &mut self,
        bits: &mut BitRing<B>,
        samples: &mut SampleRing<S>,
    ) {
        bits.set_synchronized(false);
        bits.set_state(StreamState::Inactive);
        samples.set_state(StreamState::Inactive);
    }
}

fn unsync<const B: usize>(bits: &mut BitRing<B>) {
    bits.set_synchronized(false);
    bits.realign();
}
