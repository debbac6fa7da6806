//! Configuration and Constants Tests
//!
//! Tests to verify configuration values are valid and consistent.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test config_tests

use microw::config::*;
use microw::error::LinkError;
use microw::types::{ErrorPolicy, LinkMode};

// =============================================================================
// Protocol Constants
// =============================================================================

#[test]
fn word_width_matches_converters() {
    // Both the F429 ADC and DAC are 12 bit
    assert_eq!(WORD_BITS, 12);
    assert_eq!(WORD_BYTES, 2);
}

#[test]
fn sync_marker_defaults() {
    assert_eq!(SYNC_SIGNAL, 0xFF);
    assert_eq!(SYNC_PERIOD, 64);
}

#[test]
fn bit_ring_fits_marker_and_word() {
    assert_eq!(MIN_BIT_RING_CAPACITY, 3);
    assert!(BIT_RING_CAPACITY >= MIN_BIT_RING_CAPACITY);
}

// =============================================================================
// Timing
// =============================================================================

#[test]
fn system_clock_valid() {
    // F429 runs at 168 MHz without over-drive
    assert_eq!(SYSTEM_CLOCK_HZ, 168_000_000);
}

#[test]
fn serial_outpaces_samples() {
    // 10 bits per UART frame, 1.5 bytes per sample plus markers
    let bytes_per_second = UART_BAUD_RATE / 10;
    assert!(bytes_per_second * 2 >= SAMPLE_RATE_HZ * 3);
}

#[test]
fn tick_period_from_rate() {
    assert_eq!(tick_period_us(), 125);
}

#[test]
fn default_mode_is_emitter() {
    #[cfg(not(feature = "receiver"))]
    assert_eq!(MODE, LinkMode::Emitter);
    #[cfg(feature = "receiver")]
    assert_eq!(MODE, LinkMode::Receiver);
}

// =============================================================================
// LinkConfig / RecoveryConfig
// =============================================================================

#[test]
fn default_link_config_is_valid() {
    let config = LinkConfig::default();
    assert!(config.validate());
    assert_eq!(config.sample_capacity, SAMPLE_RING_CAPACITY);
    assert_eq!(config.bit_capacity, BIT_RING_CAPACITY);
    assert_eq!(config, LinkConfig::DEFAULT);
}

#[test]
fn link_config_rejects_bad_capacities() {
    assert!(!LinkConfig::with_capacities(0, 16).validate());
    assert!(!LinkConfig::with_capacities(SAMPLE_RING_MAX + 1, 16).validate());
    assert!(!LinkConfig::with_capacities(8, MIN_BIT_RING_CAPACITY - 1).validate());
    assert!(!LinkConfig::with_capacities(8, BIT_RING_MAX + 1).validate());
    assert!(LinkConfig::with_capacities(1, MIN_BIT_RING_CAPACITY).validate());
}

#[test]
fn check_separates_storage_from_framing() {
    assert_eq!(
        LinkConfig::with_capacities(SAMPLE_RING_MAX + 1, 16).check(),
        Err(LinkError::Allocation {
            requested: SAMPLE_RING_MAX + 1,
            available: SAMPLE_RING_MAX
        })
    );
    assert_eq!(
        LinkConfig::with_capacities(8, BIT_RING_MAX + 1).check(),
        Err(LinkError::Allocation {
            requested: BIT_RING_MAX + 1,
            available: BIT_RING_MAX
        })
    );
    assert_eq!(
        LinkConfig::with_capacities(8, 2).check(),
        Err(LinkError::Configuration {
            bit_ring: 2,
            required: MIN_BIT_RING_CAPACITY
        })
    );
    assert_eq!(LinkConfig::DEFAULT.check(), Ok(()));
}

#[test]
fn sync_period_fits_a_whole_word() {
    // A cut word is re-sent from its MSB after the marker
    assert!(usize::from(SYNC_PERIOD) > WORD_BYTES);
}

#[test]
fn recovery_defaults() {
    let recovery = RecoveryConfig::default();
    assert_eq!(recovery.policy, ErrorPolicy::Restart);
    assert_eq!(recovery.max_restarts, MAX_RESTART_ATTEMPTS);
    assert_eq!(recovery.delay_ms, ERROR_DELAY_MS);
    assert!(recovery.indicate);
}

#[test]
fn recovery_with_policy_is_quiet() {
    let recovery = RecoveryConfig::with_policy(ErrorPolicy::Halt);
    assert_eq!(recovery.policy, ErrorPolicy::Halt);
    assert!(!recovery.indicate);
    assert_eq!(recovery.delay_ms, 0);
}

#[test]
fn with_recovery_keeps_capacities() {
    let config = LinkConfig::with_capacities(8, 16)
        .with_recovery(RecoveryConfig::with_policy(ErrorPolicy::Stop));
    assert_eq!(config.sample_capacity, 8);
    assert_eq!(config.bit_capacity, 16);
    assert_eq!(config.recovery.policy, ErrorPolicy::Stop);
}

// =============================================================================
// Board Wiring
// =============================================================================

#[test]
fn pins_are_unique() {
    let all = [
        pins::LED_STATUS,
        pins::ANALOG_IN,
        pins::ANALOG_OUT,
        pins::UART_TX,
        pins::UART_RX,
    ];
    for (i, a) in all.iter().enumerate() {
        for b in &all[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn uart_dma_streams_differ() {
    assert_ne!(dma::UART_TX, dma::UART_RX);
}
