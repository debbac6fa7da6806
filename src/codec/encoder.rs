//! Stream Encoder
//!
//! Drains the sample ring into the bit ring: words are packed MSB first, a byte
//! may straddle two words, and a sync marker is inserted at least every
//! `SYNC_PERIOD` bytes so a receiver joining mid-stream can align.

use crate::config::SYNC_SIGNAL;
use crate::error::{LinkError, LinkResult};
use crate::protocol::{pack_next, sync_due};
use crate::ring::{BitRing, SampleRing};
use crate::types::StreamState;

/// Outcome of one encoder update
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Encoded {
    /// Bytes pushed to the bit ring, markers included
    pub bytes: usize,
    /// Words fully consumed from the sample ring
    pub words: usize,
    /// Sync markers inserted
    pub markers: usize,
    /// Data bytes altered to avoid the marker value
    pub collisions: usize,
}

impl Encoded {
    /// Check if new bytes wait for the transmitter
    #[must_use]
    pub const fn data_ready(&self) -> bool {
        self.bytes > 0
    }
}

/// Word-to-byte packer with sync insertion
#[derive(Clone, Copy, Debug, Default)]
pub struct Encoder {
    /// `start` has been called at least once
    started: bool,
}

impl Encoder {
    /// Create an encoder that has not been started
    #[must_use]
    pub const fn new() -> Self {
        Self { started: false }
    }

    /// Check if the encoder was started
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Bind to both rings, mark them active and send a sync marker
    ///
    /// # Errors
    ///
    /// Propagates the bit ring push error if the marker does not fit.
    pub fn start<const S: usize, const B: usize>(
        &mut self,
        samples: &mut SampleRing<S>,
        bits: &mut BitRing<B>,
    ) -> LinkResult<()> {
        self.started = true;
        samples.set_state(StreamState::Active);
        bits.set_state(StreamState::Active);
        emit_sync(samples, bits)
    }

    /// Reactivate both rings and send a sync marker
    ///
    /// # Errors
    ///
    /// [`LinkError::NotStarted`] without a prior `start`, or the marker push error.
    pub fn restart<const S: usize, const B: usize>(
        &mut self,
        samples: &mut SampleRing<S>,
        bits: &mut BitRing<B>,
    ) -> LinkResult<()> {
        if !self.started {
            return Err(LinkError::NotStarted);
        }
        samples.set_state(StreamState::Active);
        bits.set_state(StreamState::Active);
        emit_sync(samples, bits)
    }

    /// Encode every available word
    ///
    /// Bytes are only formed once 8 bits are pending; leftover bits stay in the
    /// sample ring behind its partial-word cursor until more words arrive.
    ///
    /// # Errors
    ///
    /// - [`LinkError::NotStarted`] / [`LinkError::Inactive`] if not running
    /// - [`LinkError::Overrun`] if the bit ring is full; the byte is not committed
    pub fn update<const S: usize, const B: usize>(
        &mut self,
        samples: &mut SampleRing<S>,
        bits: &mut BitRing<B>,
    ) -> LinkResult<Encoded> {
        if !self.started {
            return Err(LinkError::NotStarted);
        }
        if samples.is_inactive() || bits.is_inactive() {
            return Err(LinkError::Inactive);
        }

        let mut out = Encoded::default();

        // A marker left owed by an earlier overrun goes first
        if sync_due(bits.bytes_since_sync()) {
            emit_sync(samples, bits)?;
            out.bytes += 1;
            out.markers += 1;
        }

        while let Some(packed) = pack_next(samples) {
            bits.push(packed.wire_value())?;
            samples.commit(packed.words_done, packed.bits_into_next);
            out.bytes += 1;
            out.words += packed.words_done;
            if packed.collides() {
                trace!("marker collision, flip mask {=u8:#x}", packed.flip_mask);
                out.collisions += 1;
            }

            if sync_due(bits.bytes_since_sync()) {
                emit_sync(samples, bits)?;
                out.bytes += 1;
                out.markers += 1;
            }
        }

        Ok(out)
    }

    /// Mark both rings inactive, leaving their contents alone
    pub fn stop<const S: usize, const B: usize>(
        &mut self,
        samples: &mut SampleRing<S>,
        bits: &mut BitRing<B>,
    ) {
        samples.set_state(StreamState::Inactive);
        bits.set_state(StreamState::Inactive);
    }
}

/// Push a marker and restart the current word from its MSB
///
/// The decoder drops partial bits when it realigns, so a word cut by the
/// marker is sent again whole.
fn emit_sync<const S: usize, const B: usize>(
    samples: &mut SampleRing<S>,
    bits: &mut BitRing<B>,
) -> LinkResult<()> {
    bits.push(SYNC_SIGNAL)?;
    bits.mark_sync();
    samples.rewind_partial();
    Ok(())
}
