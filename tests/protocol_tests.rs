//! Wire Protocol Tests
//!
//! End-to-end tests: encoder output fed through the decoder, over several
//! sync periods and with receivers joining mid-stream.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test protocol_tests

use microw::codec::{Decoded, Decoder, Encoder};
use microw::config::{SYNC_PERIOD, SYNC_SIGNAL, WORD_BITS};
use microw::protocol::{disambiguate, is_marker, packed_len, sync_due};
use microw::ring::{BitRing, SampleRing};
use microw::types::Word;

/// Encode `words` one at a time, collecting everything put on the wire
fn transmit(words: &[u16]) -> Vec<u8> {
    let mut encoder = Encoder::new();
    let mut samples: SampleRing = SampleRing::new();
    let mut bits: BitRing = BitRing::new();
    samples.allocate(64).unwrap();
    bits.allocate(128).unwrap();
    encoder.start(&mut samples, &mut bits).unwrap();

    let mut wire = Vec::new();
    for &w in words {
        samples.push(Word::new(w)).unwrap();
        encoder.update(&mut samples, &mut bits).unwrap();
        wire.extend(std::iter::from_fn(|| bits.pop()));
    }
    wire
}

/// Decode a byte stream the way the receiver does: one update per byte
fn receive(wire: &[u8]) -> Vec<u16> {
    let mut decoder = Decoder::new();
    let mut bits: BitRing = BitRing::new();
    let mut samples: SampleRing = SampleRing::new();
    bits.allocate(8).unwrap();
    samples.allocate(64).unwrap();
    decoder.start(&mut bits, &mut samples).unwrap();

    let mut words = Vec::new();
    for &b in wire {
        bits.push(b).unwrap();
        decoder.update(&mut bits, &mut samples).unwrap();
        words.extend(std::iter::from_fn(|| samples.pop()).map(Word::raw));
    }
    words
}

/// Words whose packing never produces a 0xFF data byte
fn collision_free(count: u16) -> Vec<u16> {
    (0..count).map(|i| (i * 7) % 0xFF).collect()
}

// =============================================================================
// Round trip
// =============================================================================

#[test]
fn round_trip_single_period() {
    let words = collision_free(20);
    assert_eq!(receive(&transmit(&words)), words);
}

#[test]
fn round_trip_across_many_periods() {
    // 400 words = 600 data bytes, well past nine sync periods
    let words = collision_free(400);
    let wire = transmit(&words);

    let markers = wire.iter().filter(|&&b| is_marker(b)).count();
    assert!(markers >= 10);
    assert_eq!(wire.len(), packed_len(words.len()) + markers);
    assert_eq!(receive(&wire), words);
}

#[test]
fn round_trip_full_scale_values_without_collisions() {
    // 0x7FE keeps the top bit clear and the low byte below 0xFF
    let words: Vec<u16> = (0..64).map(|i| if i % 2 == 0 { 0x7FE } else { 0x000 }).collect();
    assert_eq!(receive(&transmit(&words)), words);
}

#[test]
fn trailing_partial_word_is_held_back() {
    // Odd count leaves the last 4 bits unsent
    let words = collision_free(3);
    let decoded = receive(&transmit(&words));
    assert_eq!(decoded, &words[..2]);
}

// =============================================================================
// Resynchronization
// =============================================================================

#[test]
fn late_receiver_syncs_at_next_marker() {
    let words = collision_free(200);
    let wire = transmit(&words);

    let second_marker = usize::from(SYNC_PERIOD);
    assert_eq!(wire[second_marker], SYNC_SIGNAL);

    for join in [1, 10, 37, second_marker] {
        let decoded = receive(&wire[join..]);
        // One period of data carries 63 bytes = 42 words
        assert_eq!(decoded, &words[42..], "joined at byte {join}");
    }
}

#[test]
fn word_cut_by_marker_arrives_whole() {
    let words = collision_free(9);
    let mut encoder = Encoder::new();
    let mut samples: SampleRing = SampleRing::new();
    let mut bits: BitRing = BitRing::new();
    samples.allocate(64).unwrap();
    bits.allocate(128).unwrap();
    encoder.start(&mut samples, &mut bits).unwrap();

    // 5 words = 60 bits: 7 bytes out, word 4 cut after its first byte
    for &w in &words[..5] {
        samples.push(Word::new(w)).unwrap();
    }
    encoder.update(&mut samples, &mut bits).unwrap();
    encoder.restart(&mut samples, &mut bits).unwrap();
    for &w in &words[5..] {
        samples.push(Word::new(w)).unwrap();
    }
    encoder.update(&mut samples, &mut bits).unwrap();
    let wire: Vec<u8> = std::iter::from_fn(|| bits.pop()).collect();

    assert_eq!(wire[0], SYNC_SIGNAL);
    assert_eq!(wire[8], SYNC_SIGNAL);
    // Word 4 goes out again from its MSB after the marker
    assert_eq!(wire[7], wire[9]);
    assert_eq!(wire.len(), 16);

    // The trailing half of word 8 is still held back
    assert_eq!(receive(&wire), &words[..8]);
}

#[test]
fn lost_bytes_recover_within_one_period() {
    let words = collision_free(200);
    let mut wire = transmit(&words);
    // Drop two bytes in the middle of the first period
    wire.drain(20..22);

    let decoded = receive(&wire);
    let tail = &words[42..];
    assert!(decoded.ends_with(tail));
}

// =============================================================================
// Marker helpers
// =============================================================================

#[test]
fn disambiguate_flips_exactly_the_mask() {
    for shift in 0..8 {
        let mask = 1u8 << shift;
        let out = disambiguate(SYNC_SIGNAL, mask);
        assert_ne!(out, SYNC_SIGNAL);
        assert_eq!(out ^ SYNC_SIGNAL, mask);
    }
    for byte in 0..SYNC_SIGNAL {
        assert_eq!(disambiguate(byte, 0x01), byte);
    }
}

#[test]
fn sync_due_only_at_period_end() {
    for count in 0..SYNC_PERIOD - 1 {
        assert!(!sync_due(count), "count {count}");
    }
    assert!(sync_due(SYNC_PERIOD - 1));
    assert!(sync_due(u16::MAX));
}

#[test]
fn packed_len_tracks_word_width() {
    assert_eq!(packed_len(2), 2 * usize::from(WORD_BITS) / 8);
    assert_eq!(packed_len(0), 0);
}

#[test]
fn decoder_reports_sync_on_marker_only() {
    let mut decoder = Decoder::new();
    let mut bits: BitRing = BitRing::new();
    let mut samples: SampleRing = SampleRing::new();
    bits.allocate(8).unwrap();
    samples.allocate(8).unwrap();
    decoder.start(&mut bits, &mut samples).unwrap();

    for b in [0x00, 0xFE, 0xEF, 0x7F] {
        bits.push(b).unwrap();
        assert_eq!(decoder.update(&mut bits, &mut samples), Ok(Decoded::SyncWaiting));
    }
}
