//! DAC Driver
//!
//! Reconstructed signal output on DAC channel 1 (PA4). Writes are immediate,
//! so this driver needs no task.

use embassy_stm32::dac::{DacCh1, Value};
use embassy_stm32::peripherals::DAC1;

use crate::config::WORD_BITS;
use crate::periph::{AnalogOutput, PeripheralResult};
use crate::types::Word;

/// Converter resolution in bits
const DAC_BITS: u8 = 12;

/// Scale a word to the 12-bit DAC range
#[must_use]
pub const fn dac_code(word: Word) -> u16 {
    (word.raw() << DAC_BITS.saturating_sub(WORD_BITS)) >> WORD_BITS.saturating_sub(DAC_BITS)
}

/// Session-side DAC handle
pub struct HeldOutput<'d> {
    channel: DacCh1<'d, DAC1>,
}

impl<'d> HeldOutput<'d> {
    /// Wrap a configured channel
    #[must_use]
    pub fn new(channel: DacCh1<'d, DAC1>) -> Self {
        Self { channel }
    }
}

impl AnalogOutput for HeldOutput<'_> {
    fn start(&mut self) -> PeripheralResult {
        self.channel.enable();
        Ok(())
    }

    fn stop(&mut self) -> PeripheralResult {
        self.channel.disable();
        Ok(())
    }

    fn set_value(&mut self, word: Word) -> PeripheralResult {
        self.channel.set(Value::Bit12Right(dac_code(word)));
        Ok(())
    }
}
