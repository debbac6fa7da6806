//! Sample ring
//!
//! Circular buffer of [`Word`]s. In emitter mode the ADC writes and the
//! encoder reads; in receiver mode the decoder writes and the DAC reads.

use heapless::Vec;

use super::RingIndex;
use crate::config::{SAMPLE_RING_MAX, WORD_BITS};
use crate::error::{LinkError, LinkResult};
use crate::types::{RingKind, StreamState, Word};

/// Ring of sample words with a partial-word cursor for the encoder
pub struct SampleRing<const N: usize = SAMPLE_RING_MAX> {
    /// Word storage, `len()` is the active capacity
    buffer: Vec<Word, N>,
    /// Next slot to write
    write: RingIndex,
    /// Next slot to read
    read: RingIndex,
    /// Bits of the word at `read` already emitted (0..WORD_BITS)
    bits_consumed: u8,
    /// Stream state
    state: StreamState,
}

impl<const N: usize> SampleRing<N> {
    /// Create an unallocated, inactive ring
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            write: RingIndex::ZERO,
            read: RingIndex::ZERO,
            bits_consumed: 0,
            state: StreamState::Inactive,
        }
    }

    /// Reserve `capacity` zeroed slots and reset the cursors
    ///
    /// # Errors
    ///
    /// [`LinkError::Allocation`] if `capacity` is zero or exceeds the storage `N`.
    pub fn allocate(&mut self, capacity: usize) -> LinkResult<()> {
        self.buffer.clear();
        if capacity == 0 || self.buffer.resize(capacity, Word::ZERO).is_err() {
            return Err(LinkError::Allocation {
                requested: capacity,
                available: N,
            });
        }
        self.reset();
        self.state = StreamState::Inactive;
        Ok(())
    }

    /// Return the cursors to their initial position without reallocating
    pub fn reset(&mut self) {
        self.write = RingIndex::ZERO;
        self.read = RingIndex::ZERO;
        self.bits_consumed = 0;
    }

    /// Drop the storage and mark the ring inactive
    pub fn release(&mut self) {
        self.buffer.clear();
        self.reset();
        self.state = StreamState::Inactive;
    }

    /// Active capacity in words (0 when released)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Check if storage is reserved
    #[must_use]
    pub fn is_allocated(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Number of words written but not yet consumed
    #[must_use]
    pub fn available(&self) -> usize {
        match self.capacity() {
            0 => 0,
            cap => self.write.distance(self.read, cap),
        }
    }

    /// Check if no word is waiting
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.write == self.read
    }

    /// Check if the next push would overrun
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.is_allocated() && self.available() == self.capacity()
    }

    /// Store a word at the write cursor
    ///
    /// # Errors
    ///
    /// - [`LinkError::Overrun`] if every slot holds an unread word; the ring is unchanged
    /// - [`LinkError::NotStarted`] if no storage is reserved
    pub fn push(&mut self, word: Word) -> LinkResult<()> {
        let cap = self.capacity();
        if cap == 0 {
            return Err(LinkError::NotStarted);
        }
        if self.is_full() {
            return Err(LinkError::overrun(RingKind::Sample));
        }
        self.buffer[self.write.slot(cap)] = word;
        self.write = self.write.advance(1, cap);
        Ok(())
    }

    /// Take the word at the read cursor
    pub fn pop(&mut self) -> Option<Word> {
        let word = self.peek_at(0)?;
        self.advance_read(1);
        Some(word)
    }

    /// Look at the `offset`-th unread word without consuming it
    #[must_use]
    pub fn peek_at(&self, offset: usize) -> Option<Word> {
        if offset >= self.available() {
            return None;
        }
        let cap = self.capacity();
        Some(self.buffer[self.read.advance(offset, cap).slot(cap)])
    }

    /// Bits of the current word already handed to the encoder
    #[must_use]
    pub const fn bits_consumed(&self) -> u8 {
        self.bits_consumed
    }

    /// Unconsumed bits across every available word
    #[must_use]
    pub fn pending_bits(&self) -> usize {
        match self.available() {
            0 => 0,
            n => n * usize::from(WORD_BITS) - usize::from(self.bits_consumed),
        }
    }

    /// Consume `words` whole words and leave `bits` of the next one consumed
    pub(crate) fn commit(&mut self, words: usize, bits: u8) {
        self.advance_read(words);
        self.bits_consumed = if self.is_empty() { 0 } else { bits };
    }

    /// Forget the partial progress on the current word
    pub(crate) fn rewind_partial(&mut self) {
        self.bits_consumed = 0;
    }

    fn advance_read(&mut self, words: usize) {
        let cap = self.capacity();
        if cap > 0 {
            self.read = self.read.advance(words.min(self.available()), cap);
        }
        self.bits_consumed = 0;
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

impl<const N: usize> Default for SampleRing<N> {
    fn default() -> Self {
        Self::new()
    }
}
