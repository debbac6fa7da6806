//! Wire Protocol
//!
//! Bit-level framing shared by the encoder and the decoder.
//!
//! ```text
//! [SYNC 0xFF] [data]* (at most SYNC_PERIOD - 1) [SYNC 0xFF] [data]* ...
//! ```
//!
//! Data bytes carry `WORD_BITS`-wide words MSB first with no alignment between
//! word and byte boundaries. A data byte that would equal the marker gets one
//! bit flipped before transmission; the receiver never undoes that flip.

use crate::config::{SYNC_PERIOD, SYNC_SIGNAL, WORD_BITS};
use crate::ring::SampleRing;

/// Check if a byte is the sync marker
#[must_use]
pub const fn is_marker(byte: u8) -> bool {
    byte == SYNC_SIGNAL
}

/// Check if a marker must be sent after `bytes_since_sync` bytes
#[must_use]
pub const fn sync_due(bytes_since_sync: u16) -> bool {
    bytes_since_sync.saturating_add(1) >= SYNC_PERIOD
}

/// Make a data byte distinguishable from the marker
///
/// Bytes other than the marker pass through; the marker value gets exactly
/// the bits in `flip_mask` toggled.
#[must_use]
pub const fn disambiguate(byte: u8, flip_mask: u8) -> u8 {
    if is_marker(byte) {
        byte ^ flip_mask
    } else {
        byte
    }
}

/// One output byte assembled from the sample ring, not yet committed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackedByte {
    /// Natural value of the packed bits
    pub value: u8,
    /// Single bit to flip on marker collision: where the first word ending in
    /// this byte has its LSB, or the byte LSB if no word ends here
    pub flip_mask: u8,
    /// Words fully consumed by this byte
    pub words_done: usize,
    /// Bits of the following word consumed by this byte
    pub bits_into_next: u8,
}

impl PackedByte {
    /// Value to put on the wire
    #[must_use]
    pub const fn wire_value(&self) -> u8 {
        disambiguate(self.value, self.flip_mask)
    }

    /// Check if the natural value collided with the marker
    #[must_use]
    pub const fn collides(&self) -> bool {
        is_marker(self.value)
    }
}

/// Assemble the next byte from the unread words, MSB first
///
/// Starts at the partial-word cursor of the ring. Returns None while fewer
/// than 8 bits are pending; the ring itself is never modified.
#[must_use]
pub fn pack_next<const N: usize>(samples: &SampleRing<N>) -> Option<PackedByte> {
    if samples.pending_bits() < 8 {
        return None;
    }

    let mut value: u8 = 0;
    let mut flip_mask: Option<u8> = None;
    let mut offset = 0;
    let mut consumed = samples.bits_consumed();
    let mut word = samples.peek_at(offset)?;

    for pos in 0..8u8 {
        if consumed == WORD_BITS {
            offset += 1;
            consumed = 0;
            word = samples.peek_at(offset)?;
        }
        value = (value << 1) | u8::from(word.bit_msb_first(consumed));
        consumed += 1;
        if consumed == WORD_BITS && flip_mask.is_none() {
            flip_mask = Some(0x80 >> pos);
        }
    }

    if consumed == WORD_BITS {
        offset += 1;
        consumed = 0;
    }

    Some(PackedByte {
        value,
        flip_mask: flip_mask.unwrap_or(0x01),
        words_done: offset,
        bits_into_next: consumed,
    })
}

/// Wire bytes needed for `words` words, markers excluded
#[must_use]
pub const fn packed_len(words: usize) -> usize {
    (words * WORD_BITS as usize) / 8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Word;

    fn ring(words: &[u16]) -> SampleRing<8> {
        let mut ring = SampleRing::new();
        ring.allocate(8).unwrap();
        for &w in words {
            ring.push(Word::new(w)).unwrap();
        }
        ring
    }

    #[test]
    fn packs_head_of_first_word() {
        let packed = pack_next(&ring(&[0x0AB])).unwrap();
        assert_eq!(packed.value, 0x0A);
        assert_eq!(packed.words_done, 0);
        assert_eq!(packed.bits_into_next, 8);
        assert_eq!(packed.flip_mask, 0x01);
    }

    #[test]
    fn straddling_byte_flips_at_word_lsb() {
        let mut samples = ring(&[0x0FF, 0xF00]);
        samples.commit(0, 8);
        let packed = pack_next(&samples).unwrap();
        // last 4 bits of 0x0FF then first 4 bits of 0xF00
        assert_eq!(packed.value, 0xFF);
        assert_eq!(packed.flip_mask, 0x10);
        assert_eq!(packed.wire_value(), 0xEF);
        assert_eq!(packed.words_done, 1);
        assert_eq!(packed.bits_into_next, 4);
    }

    #[test]
    fn short_pending_window_yields_nothing() {
        let mut samples = ring(&[0x123]);
        samples.commit(0, 8);
        assert!(pack_next(&samples).is_none());
    }

    #[test]
    fn sync_due_at_period_boundary() {
        assert!(!sync_due(SYNC_PERIOD - 2));
        assert!(sync_due(SYNC_PERIOD - 1));
    }
}
