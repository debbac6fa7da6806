//! Types Module Tests
//!
//! Tests for domain types (Word, stream states, policies) and error formatting.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test types_tests

use microw::config::WORD_BITS;
use microw::error::{LinkError, PeripheralError};
use microw::types::{ErrorPolicy, RingKind, StreamState, Word};

// =============================================================================
// Word Tests
// =============================================================================

#[test]
fn test_word_masks_to_width() {
    assert_eq!(Word::new(0xFFFF).raw(), Word::MASK);
    assert_eq!(Word::new(0x1ABC).raw(), 0xABC);
    assert_eq!(Word::MASK, (1 << WORD_BITS) - 1);
}

#[test]
fn test_word_from_raw_rejects_wide_values() {
    assert_eq!(Word::from_raw(0xFFF), Some(Word::MAX));
    assert!(Word::from_raw(0x1000).is_none());
    assert_eq!(Word::from_raw(0), Some(Word::ZERO));
}

#[test]
fn test_word_bits_msb_first() {
    let word = Word::new(0x801);
    assert!(word.bit_msb_first(0));
    for i in 1..WORD_BITS - 1 {
        assert!(!word.bit_msb_first(i), "bit {i}");
    }
    assert!(word.bit_msb_first(WORD_BITS - 1));
}

#[test]
fn test_word_bits_rebuild_value() {
    for raw in [0x000, 0x0AB, 0x123, 0x7FF, 0xFFF] {
        let word = Word::new(raw);
        let rebuilt = (0..WORD_BITS).fold(0u16, |acc, i| (acc << 1) | u16::from(word.bit_msb_first(i)));
        assert_eq!(rebuilt, raw);
    }
}

#[test]
fn test_word_mid_scale() {
    assert_eq!(Word::MID.raw(), 0x800);
    assert!(Word::ZERO < Word::MID && Word::MID < Word::MAX);
}

#[test]
fn test_word_debug_is_hex() {
    assert_eq!(format!("{:?}", Word::new(0x0AB)), "Word(0x0AB)");
}

// =============================================================================
// State and Policy Tests
// =============================================================================

#[test]
fn test_stream_state_default_inactive() {
    assert_eq!(StreamState::default(), StreamState::Inactive);
}

#[test]
fn test_error_policy_default_restart() {
    assert_eq!(ErrorPolicy::default(), ErrorPolicy::Restart);
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_peripheral_error_converts() {
    let err: LinkError = PeripheralError::Uart.into();
    assert_eq!(err, LinkError::Peripheral(PeripheralError::Uart));
    assert!(!err.is_overrun());
}

#[test]
fn test_overrun_helper() {
    let err = LinkError::overrun(RingKind::Bit);
    assert!(err.is_overrun());
    assert_eq!(err.to_string(), "bit ring overrun");
}

#[test]
fn test_error_display() {
    let config = LinkError::Configuration {
        bit_ring: 2,
        required: 3,
    };
    assert_eq!(config.to_string(), "bit ring of 2 bytes is too small, need 3");
    assert_eq!(
        LinkError::Peripheral(PeripheralError::Adc).to_string(),
        "peripheral error: ADC fault"
    );
    assert_eq!(LinkError::Inactive.to_string(), "stream inactive");
}
