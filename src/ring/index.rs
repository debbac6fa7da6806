//! Wrapping ring cursor
//!
//! A [`RingIndex`] counts modulo `2 * capacity` instead of `capacity`. The
//! extra lap bit tells an empty ring (cursors equal) from a full one (cursors
//! `capacity` apart) without sacrificing a slot.
//!
//! Pre-condition for every operation: `capacity >= 1` and all cursors compared
//! belong to the same ring. Post-conditions:
//! - `slot() < capacity`
//! - `distance(from)` is in `0..=capacity` for cursors of a consistent ring
//! - `advance(n)` keeps the cursor inside `0..2 * capacity`

/// Cursor into a ring of fixed capacity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct RingIndex {
    /// Position in `0..2 * capacity`
    value: usize,
}

impl RingIndex {
    /// Cursor at the origin of the ring
    pub const ZERO: Self = Self { value: 0 };

    /// Build a cursor from a raw position, reduced into `0..2 * capacity`
    #[must_use]
    pub const fn new(value: usize, capacity: usize) -> Self {
        Self {
            value: value % (2 * capacity),
        }
    }

    /// Raw position in `0..2 * capacity`
    #[must_use]
    pub const fn raw(self) -> usize {
        self.value
    }

    /// Buffer slot this cursor points at
    #[must_use]
    pub const fn slot(self, capacity: usize) -> usize {
        if self.value >= capacity {
            self.value - capacity
        } else {
            self.value
        }
    }

    /// Cursor moved forward by `n` positions
    #[must_use]
    pub const fn advance(self, n: usize, capacity: usize) -> Self {
        let span = 2 * capacity;
        Self {
            value: (self.value + n % span) % span,
        }
    }

    /// Number of items between `from` (consumer) and `self` (producer)
    #[must_use]
    pub const fn distance(self, from: Self, capacity: usize) -> usize {
        let span = 2 * capacity;
        (self.value + span - from.value) % span
    }
}
