//! Ring Buffer Tests
//!
//! Tests for the sample ring, the bit ring and the wrapping cursor they share.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test ring_tests

use microw::error::LinkError;
use microw::ring::{BitRing, RingIndex, SampleRing};
use microw::types::{RingKind, StreamState, Word};

// =============================================================================
// RingIndex Tests
// =============================================================================

#[test]
fn index_distance_covers_empty_to_full() {
    for cap in 1..=9 {
        for start in 0..2 * cap {
            let read = RingIndex::new(start, cap);
            for n in 0..=cap {
                let write = read.advance(n, cap);
                assert_eq!(write.distance(read, cap), n, "cap={cap} start={start} n={n}");
            }
        }
    }
}

#[test]
fn index_advance_wraps_after_two_laps() {
    for cap in 1..=9 {
        let idx = RingIndex::ZERO.advance(2 * cap, cap);
        assert_eq!(idx, RingIndex::ZERO);
        assert!(idx.advance(cap, cap).raw() < 2 * cap);
    }
}

#[test]
fn index_full_and_empty_share_a_slot() {
    let cap = 5;
    let read = RingIndex::new(3, cap);
    let full = read.advance(cap, cap);
    assert_eq!(full.slot(cap), read.slot(cap));
    assert_ne!(full, read);
}

// =============================================================================
// SampleRing Tests
// =============================================================================

fn sample_ring(capacity: usize) -> SampleRing<16> {
    let mut ring = SampleRing::new();
    ring.allocate(capacity).unwrap();
    ring
}

#[test]
fn sample_ring_fifth_write_overruns_capacity_four() {
    let mut ring = sample_ring(4);
    for raw in [0x001, 0x002, 0x003, 0x004] {
        ring.push(Word::new(raw)).unwrap();
    }

    assert_eq!(
        ring.push(Word::new(0x005)),
        Err(LinkError::Overrun {
            ring: RingKind::Sample
        })
    );

    // First four untouched
    assert_eq!(ring.available(), 4);
    for raw in [0x001, 0x002, 0x003, 0x004] {
        assert_eq!(ring.pop(), Some(Word::new(raw)));
    }
}

#[test]
fn sample_ring_fifo_across_wrap() {
    let mut ring = sample_ring(3);
    let mut expected = Vec::new();
    let mut seen = Vec::new();

    for raw in 0..20u16 {
        ring.push(Word::new(raw)).unwrap();
        expected.push(Word::new(raw));
        if raw % 2 == 1 {
            while let Some(w) = ring.pop() {
                seen.push(w);
            }
        }
    }

    assert_eq!(seen, expected);
}

#[test]
fn sample_ring_peek_does_not_consume() {
    let mut ring = sample_ring(4);
    ring.push(Word::new(0xABC)).unwrap();
    ring.push(Word::new(0x123)).unwrap();

    assert_eq!(ring.peek_at(0), Some(Word::new(0xABC)));
    assert_eq!(ring.peek_at(1), Some(Word::new(0x123)));
    assert_eq!(ring.peek_at(2), None);
    assert_eq!(ring.available(), 2);
}

#[test]
fn sample_ring_push_before_allocation_fails() {
    let mut ring: SampleRing<4> = SampleRing::new();
    assert_eq!(ring.push(Word::ZERO), Err(LinkError::NotStarted));
    assert_eq!(ring.pop(), None);
}

#[test]
fn sample_ring_zero_capacity_rejected() {
    let mut ring: SampleRing<4> = SampleRing::new();
    assert_eq!(
        ring.allocate(0),
        Err(LinkError::Allocation {
            requested: 0,
            available: 4
        })
    );
}

#[test]
fn sample_ring_reset_keeps_storage() {
    let mut ring = sample_ring(4);
    ring.push(Word::new(7)).unwrap();
    ring.reset();

    assert!(ring.is_empty());
    assert_eq!(ring.capacity(), 4);
    assert_eq!(ring.pending_bits(), 0);
}

#[test]
fn sample_ring_release_drops_storage() {
    let mut ring = sample_ring(4);
    ring.set_state(StreamState::Active);
    ring.release();

    assert!(!ring.is_allocated());
    assert!(ring.is_inactive());
}

// =============================================================================
// BitRing Tests
// =============================================================================

fn bit_ring(capacity: usize, bytes: &[u8]) -> BitRing<16> {
    let mut ring = BitRing::new();
    ring.allocate(capacity).unwrap();
    for &b in bytes {
        ring.push(b).unwrap();
    }
    ring
}

#[test]
fn bit_ring_overrun_leaves_contents() {
    let mut ring = bit_ring(3, &[0x01, 0x02, 0x03]);
    assert!(ring.is_full());
    assert_eq!(
        ring.push(0x04),
        Err(LinkError::Overrun { ring: RingKind::Bit })
    );
    assert_eq!(ring.pop(), Some(0x01));
    assert_eq!(ring.pop(), Some(0x02));
    assert_eq!(ring.pop(), Some(0x03));
    assert_eq!(ring.pop(), None);
}

#[test]
fn bit_ring_reads_words_msb_first() {
    let mut ring = bit_ring(4, &[0x0A, 0xB1, 0x23]);
    assert_eq!(ring.read_bits(12), Some(0x0AB));
    assert_eq!(ring.read_bits(12), Some(0x123));
    assert_eq!(ring.read_bits(1), None);
}

#[test]
fn bit_ring_read_bits_at_every_offset() {
    // 0xA5 0x5A repeated: any window is a shift of that pattern
    let mut ring = bit_ring(8, &[0xA5, 0x5A, 0xA5, 0x5A]);
    let stream: u32 = 0xA55A_A55A;
    let mut offset = 0u32;
    while let Some(v) = ring.read_bits(3) {
        let expected = (stream >> (32 - 3 - offset)) & 0b111;
        assert_eq!(u32::from(v), expected, "offset {offset}");
        offset += 3;
    }
    assert_eq!(offset, 30);
    assert_eq!(ring.unread_bits(), 2);
}

#[test]
fn bit_ring_peek_then_pop() {
    let mut ring = bit_ring(4, &[0x42, 0x43]);
    assert_eq!(ring.peek(), Some(0x42));
    assert_eq!(ring.pop(), Some(0x42));
    assert_eq!(ring.peek(), Some(0x43));
}

#[test]
fn bit_ring_counts_bytes_since_sync() {
    let mut ring = bit_ring(8, &[]);
    ring.mark_sync();
    assert_eq!(ring.bytes_since_sync(), 0);
    ring.push(0x00).unwrap();
    ring.push(0x00).unwrap();
    assert_eq!(ring.bytes_since_sync(), 2);
}

#[test]
fn bit_ring_reset_clears_sync() {
    let mut ring = bit_ring(4, &[0xFF]);
    ring.set_synchronized(true);
    ring.reset();
    assert!(!ring.is_synchronized());
    assert_eq!(ring.latest(), None);
    assert!(ring.is_empty());
}

#[test]
fn bit_ring_allocation_beyond_storage() {
    let mut ring: BitRing<4> = BitRing::new();
    assert_eq!(
        ring.allocate(5),
        Err(LinkError::Allocation {
            requested: 5,
            available: 4
        })
    );
}
