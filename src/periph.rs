//! Peripheral seams
//!
//! The link core talks to hardware only through these traits. Every call is
//! non-blocking: completions come back as [`Event`](crate::link::Event)s fed to
//! the orchestrator. The target implementations live in `hal`; host tests use
//! recording mocks.

use crate::error::PeripheralError;
use crate::types::Word;

/// Result of a peripheral request
pub type PeripheralResult = Result<(), PeripheralError>;

/// Sampled analog input (ADC)
pub trait AnalogInput {
    /// Enable the converter
    ///
    /// # Errors
    ///
    /// Driver specific.
    fn start(&mut self) -> PeripheralResult;

    /// Disable the converter
    ///
    /// # Errors
    ///
    /// Driver specific.
    fn stop(&mut self) -> PeripheralResult;

    /// Request one conversion; completion is signalled as `SampleReady`
    ///
    /// # Errors
    ///
    /// [`PeripheralError::Busy`] if a conversion is still running.
    fn convert(&mut self) -> PeripheralResult;

    /// Raw value of the last completed conversion
    fn last_value(&self) -> u16;
}

/// Analog output (DAC)
pub trait AnalogOutput {
    /// Enable the output
    ///
    /// # Errors
    ///
    /// Driver specific.
    fn start(&mut self) -> PeripheralResult;

    /// Disable the output
    ///
    /// # Errors
    ///
    /// Driver specific.
    fn stop(&mut self) -> PeripheralResult;

    /// Drive the output to `word`
    ///
    /// # Errors
    ///
    /// Driver specific.
    fn set_value(&mut self, word: Word) -> PeripheralResult;
}

/// Serial transmitter; completion is signalled as `ByteSent`
pub trait ByteSink {
    /// Queue one byte for transmission
    ///
    /// # Errors
    ///
    /// [`PeripheralError::Busy`] if the previous byte is still in flight.
    fn send_byte(&mut self, byte: u8) -> PeripheralResult;
}

/// Serial receiver; bytes arrive as `ByteReceived`
pub trait ByteSource {
    /// Start listening
    ///
    /// # Errors
    ///
    /// Driver specific.
    fn start(&mut self) -> PeripheralResult;

    /// Stop listening
    ///
    /// # Errors
    ///
    /// Driver specific.
    fn stop(&mut self) -> PeripheralResult;
}

/// Periodic sample clock; ticks arrive as `Tick`
pub trait TickSource {
    /// Start ticking at the configured sample rate
    ///
    /// # Errors
    ///
    /// Driver specific.
    fn start(&mut self) -> PeripheralResult;

    /// Stop ticking
    ///
    /// # Errors
    ///
    /// Driver specific.
    fn stop(&mut self) -> PeripheralResult;
}
