//! System configuration and protocol constants
//!
//! This module defines compile-time constants for the MicroW link.
//! Word width, sync framing, ring sizes, recovery policy and the pin/peripheral
//! assignments of the STM32F429ZI board are centralized here.

use crate::error::{LinkError, LinkResult};
use crate::types::{ErrorPolicy, LinkMode};

/// System clock frequency (STM32F429ZI @ 168MHz from the 8MHz ST-LINK clock)
pub const SYSTEM_CLOCK_HZ: u32 = 168_000_000;

/// Bits carried per sample word (ADC/DAC resolution)
pub const WORD_BITS: u8 = 12;

/// Reserved byte value marking a resynchronization point
pub const SYNC_SIGNAL: u8 = 0xFF;

/// Maximum number of bytes between two sync markers (marker included)
pub const SYNC_PERIOD: u16 = 64;

/// Bytes needed to hold one full word
pub const WORD_BYTES: usize = (WORD_BITS as usize).div_ceil(8);

/// Smallest usable bit ring: one marker plus one full word
pub const MIN_BIT_RING_CAPACITY: usize = 1 + WORD_BYTES;

/// Storage reserved for the sample ring, in words
pub const SAMPLE_RING_MAX: usize = 64;

/// Storage reserved for the bit ring, in bytes
pub const BIT_RING_MAX: usize = 128;

/// Default sample ring capacity for a session
pub const SAMPLE_RING_CAPACITY: usize = 64;

/// Default bit ring capacity for a session
pub const BIT_RING_CAPACITY: usize = 128;

/// Sample (tick) rate in Hz
pub const SAMPLE_RATE_HZ: u32 = 8_000;

/// Serial link baud rate
pub const UART_BAUD_RATE: u32 = 230_400;

/// Error policy applied when a session reports a failure
pub const DEFAULT_ERROR_POLICY: ErrorPolicy = ErrorPolicy::Restart;

/// Recovery attempts before a failing restart falls back to halt
pub const MAX_RESTART_ATTEMPTS: u8 = 3;

/// Delay before a recovery action, in milliseconds (0 = none)
pub const ERROR_DELAY_MS: u32 = 100;

/// Toggle the status LED on every escalated error
pub const ERROR_INDICATOR: bool = true;

/// Depth of the event queue between peripheral tasks and the link task
pub const EVENT_QUEUE_DEPTH: usize = 16;

/// Link mode baked into this firmware image
#[cfg(feature = "receiver")]
pub const MODE: LinkMode = LinkMode::Receiver;

/// Link mode baked into this firmware image
#[cfg(not(feature = "receiver"))]
pub const MODE: LinkMode = LinkMode::Emitter;

const _: () = assert!(WORD_BITS >= 1 && WORD_BITS <= 16, "WORD_BITS must fit a u16");
// A word cut by a marker is re-sent whole, so one period must fit a word
const _: () = assert!(
    SYNC_PERIOD as usize > WORD_BYTES,
    "a sync period must carry at least one full word"
);
const _: () = assert!(SAMPLE_RING_CAPACITY <= SAMPLE_RING_MAX);
const _: () = assert!(BIT_RING_CAPACITY <= BIT_RING_MAX);
const _: () = assert!(BIT_RING_CAPACITY >= MIN_BIT_RING_CAPACITY);

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments for the NUCLEO-F429ZI board

    /// Status / error LED (LD1)
    pub const LED_STATUS: &str = "PB0";

    /// Analog input (Arduino A0)
    pub const ANALOG_IN: &str = "PA3";

    /// Analog output (DAC1 OUT1)
    pub const ANALOG_OUT: &str = "PA4";

    /// USART3 TX (ST-LINK virtual COM)
    pub const UART_TX: &str = "PD8";

    /// USART3 RX (ST-LINK virtual COM)
    pub const UART_RX: &str = "PD9";
}

/// DMA channel assignments
pub mod dma {
    //! DMA streams used by the serial link

    /// USART3 TX DMA stream
    pub const UART_TX: u8 = 3;

    /// USART3 RX DMA stream
    pub const UART_RX: u8 = 1;
}

/// Recovery settings for the link orchestrator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoveryConfig {
    /// What to do when a session fails
    pub policy: ErrorPolicy,
    /// Toggle the indicator on every escalated error
    pub indicate: bool,
    /// Wait before acting, in milliseconds
    pub delay_ms: u32,
    /// Failed recoveries tolerated before halting
    pub max_restarts: u8,
}

impl RecoveryConfig {
    /// Build-time recovery settings
    pub const DEFAULT: Self = Self {
        policy: DEFAULT_ERROR_POLICY,
        indicate: ERROR_INDICATOR,
        delay_ms: ERROR_DELAY_MS,
        max_restarts: MAX_RESTART_ATTEMPTS,
    };

    /// Recovery settings with a given policy and no side effects
    #[must_use]
    pub const fn with_policy(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            indicate: false,
            delay_ms: 0,
            max_restarts: MAX_RESTART_ATTEMPTS,
        }
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Session sizing and recovery settings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkConfig {
    /// Sample ring capacity in words
    pub sample_capacity: usize,
    /// Bit ring capacity in bytes
    pub bit_capacity: usize,
    /// Error recovery settings
    pub recovery: RecoveryConfig,
}

impl LinkConfig {
    /// Build-time capacities and recovery settings
    pub const DEFAULT: Self = Self {
        sample_capacity: SAMPLE_RING_CAPACITY,
        bit_capacity: BIT_RING_CAPACITY,
        recovery: RecoveryConfig::DEFAULT,
    };

    /// Build a configuration with explicit ring capacities
    #[must_use]
    pub const fn with_capacities(sample_capacity: usize, bit_capacity: usize) -> Self {
        Self {
            sample_capacity,
            bit_capacity,
            ..Self::DEFAULT
        }
    }

    /// Replace the recovery settings
    #[must_use]
    pub const fn with_recovery(self, recovery: RecoveryConfig) -> Self {
        Self { recovery, ..self }
    }

    /// Check that both rings fit their storage and the bit ring can frame a word
    #[must_use]
    pub const fn validate(&self) -> bool {
        self.check().is_ok()
    }

    /// Like [`validate`](Self::validate), naming the offending capacity
    ///
    /// # Errors
    ///
    /// [`LinkError::Allocation`] when a ring does not fit its storage,
    /// [`LinkError::Configuration`] when the bit ring cannot hold a marker
    /// plus one word.
    pub const fn check(&self) -> LinkResult<()> {
        if self.sample_capacity == 0 || self.sample_capacity > SAMPLE_RING_MAX {
            return Err(LinkError::Allocation {
                requested: self.sample_capacity,
                available: SAMPLE_RING_MAX,
            });
        }
        if self.bit_capacity > BIT_RING_MAX {
            return Err(LinkError::Allocation {
                requested: self.bit_capacity,
                available: BIT_RING_MAX,
            });
        }
        if self.bit_capacity < MIN_BIT_RING_CAPACITY {
            return Err(LinkError::Configuration {
                bit_ring: self.bit_capacity,
                required: MIN_BIT_RING_CAPACITY,
            });
        }
        Ok(())
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Tick period derived from the sample rate, in microseconds
#[must_use]
pub const fn tick_period_us() -> u32 {
    1_000_000 / SAMPLE_RATE_HZ
}
