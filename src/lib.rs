//! MicroW Analog Link Library
//!
//! Carries an analog signal over a serial line between two STM32F429ZI
//! boards. The emitter samples with the ADC, packs fixed-width words into a
//! byte stream framed by sync markers and sends it over USART3; the receiver
//! decodes the stream and reconstructs the signal on the DAC.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      LINK LAYER                             │
//! │  Orchestrator (error policy)  │  Emitter / Receiver session │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      CODEC LAYER                            │
//! │  Encoder  │  Decoder  │  Wire protocol (sync, flip)         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      STORAGE                                │
//! │  SampleRing (words)  │  BitRing (bytes + bit cursor)        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                HAL / PERIPHERAL SEAMS                       │
//! │  ADC  │  DAC  │  USART  │  Tick timer  │  Status LED        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                         │
//! │           embassy-rs (async/await executor)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything above the HAL is plain `no_std` logic and runs in host tests
//! with the `std` feature.

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_sync;
#[cfg(feature = "embedded")]
pub use embassy_time;

#[macro_use]
mod fmt;

/// Hardware Abstraction Layer
///
/// embassy-backed implementations of the peripheral traits for the
/// STM32F429ZI.
#[cfg(feature = "embedded")]
pub mod hal;

/// Peripheral traits the link core is written against
pub mod periph;

/// Ring buffers
///
/// Sample and bit rings over fixed `heapless` storage.
pub mod ring;

/// Wire protocol helpers
pub mod protocol;

/// Encoder and decoder
pub mod codec;

/// Sessions, orchestrator and error policy
pub mod link;

/// Shared types used across modules
pub mod types;

/// Error types
pub mod error;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::codec::{Decoded, Decoder, Encoded, Encoder};
    pub use crate::config::*;
    pub use crate::error::{LinkError, LinkResult, PeripheralError};
    pub use crate::link::{Emitter, Event, Link, LinkState, Orchestrator, Receiver, Session};
    pub use crate::periph::{AnalogInput, AnalogOutput, ByteSink, ByteSource, TickSource};
    pub use crate::ring::{BitRing, SampleRing};
    pub use crate::types::*;

    // Common traits
    pub use embedded_hal::delay::DelayNs;
    pub use embedded_hal::digital::OutputPin;

    // Embassy
    #[cfg(feature = "embedded")]
    pub use embassy_time::{Duration, Instant, Timer};

    // Logging
    #[cfg(feature = "embedded")]
    pub use defmt::{debug, error, info, trace, warn};
}
