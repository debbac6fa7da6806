//! Bit ring
//!
//! Circular buffer of bytes. In emitter mode the encoder writes whole bytes and
//! the UART drains them; in receiver mode the UART writes and the decoder reads
//! bit by bit. The read position is the absolute bit `read.slot() * 8 + bit_cursor`,
//! wrapping at `capacity * 8`.

use heapless::Vec;

use super::RingIndex;
use crate::config::{BIT_RING_MAX, SYNC_PERIOD};
use crate::error::{LinkError, LinkResult};
use crate::types::{RingKind, StreamState};

/// Byte ring with sub-byte read cursor and synchronization bookkeeping
pub struct BitRing<const N: usize = BIT_RING_MAX> {
    /// Byte storage, `len()` is the active capacity
    buffer: Vec<u8, N>,
    /// Next slot to write
    write: RingIndex,
    /// Slot holding the next unread bit
    read: RingIndex,
    /// Bit position inside the byte at `read` (0 = MSB)
    bit_cursor: u8,
    /// A sync marker has been observed since the last reset
    synchronized: bool,
    /// Bytes pushed since the last marker
    bytes_since_sync: u16,
    /// At least one byte written since the last reset
    written: bool,
    /// Stream state
    state: StreamState,
}

impl<const N: usize> BitRing<N> {
    /// Create an unallocated, inactive ring
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            write: RingIndex::ZERO,
            read: RingIndex::ZERO,
            bit_cursor: 0,
            synchronized: false,
            bytes_since_sync: SYNC_PERIOD,
            written: false,
            state: StreamState::Inactive,
        }
    }

    /// Reserve `capacity` zeroed bytes and reset the cursors
    ///
    /// # Errors
    ///
    /// [`LinkError::Allocation`] if `capacity` is zero or exceeds the storage `N`.
    pub fn allocate(&mut self, capacity: usize) -> LinkResult<()> {
        self.buffer.clear();
        if capacity == 0 || self.buffer.resize(capacity, 0).is_err() {
            return Err(LinkError::Allocation {
                requested: capacity,
                available: N,
            });
        }
        self.reset();
        self.state = StreamState::Inactive;
        Ok(())
    }

    /// Return cursors and sync bookkeeping to their initial values
    pub fn reset(&mut self) {
        self.write = RingIndex::ZERO;
        self.read = RingIndex::ZERO;
        self.bit_cursor = 0;
        self.synchronized = false;
        self.bytes_since_sync = SYNC_PERIOD;
        self.written = false;
    }

    /// Drop the storage and mark the ring inactive
    pub fn release(&mut self) {
        self.buffer.clear();
        self.reset();
        self.state = StreamState::Inactive;
    }

    /// Active capacity in bytes (0 when released)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Check if storage is reserved
    #[must_use]
    pub fn is_allocated(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Bytes written and not fully consumed (a partially read byte counts)
    #[must_use]
    pub fn unread_bytes(&self) -> usize {
        match self.capacity() {
            0 => 0,
            cap => self.write.distance(self.read, cap),
        }
    }

    /// Bits available between the read cursor and the write cursor
    #[must_use]
    pub fn unread_bits(&self) -> usize {
        match self.unread_bytes() {
            0 => 0,
            n => n * 8 - usize::from(self.bit_cursor),
        }
    }

    /// Check if nothing is waiting
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.write == self.read
    }

    /// Check if the next push would overrun
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.is_allocated() && self.unread_bytes() == self.capacity()
    }

    /// Store a byte at the write cursor
    ///
    /// # Errors
    ///
    /// - [`LinkError::Overrun`] if the writer would catch the reader; the ring is unchanged
    /// - [`LinkError::NotStarted`] if no storage is reserved
    pub fn push(&mut self, byte: u8) -> LinkResult<()> {
        let cap = self.capacity();
        if cap == 0 {
            return Err(LinkError::NotStarted);
        }
        if self.is_full() {
            return Err(LinkError::overrun(RingKind::Bit));
        }
        self.buffer[self.write.slot(cap)] = byte;
        self.write = self.write.advance(1, cap);
        self.written = true;
        self.bytes_since_sync = self.bytes_since_sync.saturating_add(1);
        Ok(())
    }

    /// Take the whole byte at the read cursor (transport side)
    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let cap = self.capacity();
        let byte = self.buffer[self.read.slot(cap)];
        self.read = self.read.advance(1, cap);
        self.bit_cursor = 0;
        Some(byte)
    }

    /// Whole byte at the read cursor, left in place
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        Some(self.buffer[self.read.slot(self.capacity())])
    }

    /// Most recently written byte, even if already consumed
    #[must_use]
    pub fn latest(&self) -> Option<u8> {
        let cap = self.capacity();
        if cap == 0 || !self.written {
            return None;
        }
        let last = self.write.advance(2 * cap - 1, cap);
        Some(self.buffer[last.slot(cap)])
    }

    /// Read `count` bits MSB first, advancing the bit and byte cursors
    ///
    /// Returns None without moving if fewer than `count` bits are available.
    pub fn read_bits(&mut self, count: u8) -> Option<u16> {
        if count > 16 || usize::from(count) > self.unread_bits() {
            return None;
        }
        let cap = self.capacity();
        let mut value: u16 = 0;
        for _ in 0..count {
            let byte = self.buffer[self.read.slot(cap)];
            let bit = (byte >> (7 - self.bit_cursor)) & 1;
            value = (value << 1) | u16::from(bit);
            self.bit_cursor += 1;
            if self.bit_cursor == 8 {
                self.bit_cursor = 0;
                self.read = self.read.advance(1, cap);
            }
        }
        Some(value)
    }

    /// Move the read cursor just past the most recent byte (bit 0)
    pub fn realign(&mut self) {
        self.read = self.write;
        self.bit_cursor = 0;
    }

    /// Bit position inside the byte at the read cursor
    #[must_use]
    pub const fn bit_cursor(&self) -> u8 {
        self.bit_cursor
    }

    /// Check if a sync marker has been observed
    #[must_use]
    pub const fn is_synchronized(&self) -> bool {
        self.synchronized
    }

    /// Set or clear the synchronized flag
    pub fn set_synchronized(&mut self, synchronized: bool) {
        self.synchronized = synchronized;
    }

    /// Bytes pushed since the last sync marker
    #[must_use]
    pub const fn bytes_since_sync(&self) -> u16 {
        self.bytes_since_sync
    }

    /// Record that a sync marker was just emitted or consumed
    pub fn mark_sync(&mut self) {
        self.bytes_since_sync = 0;
    }

    /// Current stream state
    #[must_use]
    pub const fn state(&self) -> StreamState {
        self.state
    }

    /// Set the stream state
    pub fn set_state(&mut self, state: StreamState) {
        self.state = state;
    }

    /// Check if the stream is inactive
    #[must_use]
    pub fn is_inactive(&self) -> bool {
        self.state == StreamState::Inactive
    }

    /// Raw cursors `(write, read)` for diagnostics
    #[must_use]
    pub const fn cursors(&self) -> (RingIndex, RingIndex) {
        (self.write, self.read)
    }
}

impl<const N: usize> Default for BitRing<N> {
    fn default() -> Self {
        Self::new()
    }
}
