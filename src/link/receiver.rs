//! Receiver session
//!
//! UART -> bit ring -> decoder -> sample ring -> DAC. Each received byte runs
//! the decoder; the tick is the reconstruction clock and moves one queued word
//! to the analog output, holding the previous level when nothing is queued.

use super::{Event, Session};
use crate::codec::{Decoded, Decoder};
use crate::config::LinkConfig;
use crate::error::{LinkError, LinkResult};
use crate::periph::{AnalogOutput, ByteSource, TickSource};
use crate::ring::{BitRing, SampleRing};
use crate::types::{LinkMode, Word};

/// Reconstructing side of the link
pub struct Receiver<D, R, K> {
    output: D,
    source: R,
    ticker: K,
    bits: BitRing,
    samples: SampleRing,
    decoder: Decoder,
    config: LinkConfig,
    /// Level currently driven on the output
    held: Word,
}

impl<D, R, K> Receiver<D, R, K>
where
    D: AnalogOutput,
    R: ByteSource,
    K: TickSource,
{
    /// Bind the peripherals; nothing runs until `start`
    pub const fn new(output: D, source: R, ticker: K) -> Self {
        Self {
            output,
            source,
            ticker,
            bits: BitRing::new(),
            samples: SampleRing::new(),
            decoder: Decoder::new(),
            config: LinkConfig::DEFAULT,
            held: Word::ZERO,
        }
    }

    /// Bytes waiting to be decoded
    pub fn bits(&self) -> &BitRing {
        &self.bits
    }

    /// Words waiting for the output tick
    pub fn samples(&self) -> &SampleRing {
        &self.samples
    }

    /// Level currently driven on the output
    pub const fn held(&self) -> Word {
        self.held
    }

    /// Analog output binding
    pub fn output(&self) -> &D {
        &self.output
    }

    /// Transport binding
    pub fn source(&self) -> &R {
        &self.source
    }

    /// Tick binding
    pub fn ticker(&self) -> &K {
        &self.ticker
    }

    fn on_byte(&mut self, byte: u8) -> LinkResult<usize> {
        self.bits.push(byte)?;
        match self.decoder.update(&mut self.bits, &mut self.samples)? {
            Decoded::Words(n) => Ok(n),
            Decoded::Synchronized | Decoded::SyncWaiting | Decoded::NoData => Ok(0),
        }
    }

    fn on_tick(&mut self) -> LinkResult<usize> {
        if let Some(word) = self.samples.pop() {
            self.held = word;
        }
        self.output.set_value(self.held)?;
        Ok(0)
    }

    fn bring_up(&mut self) -> LinkResult<()> {
        self.output.start()?;
        self.output.set_value(self.held)?;
        self.source.start()?;
        self.ticker.start()?;
        Ok(())
    }

    fn quiesce(&mut self) -> LinkResult<()> {
        let ticker = self.ticker.stop();
        let source = self.source.stop();
        let output = self.output.stop();
        self.decoder.stop(&mut self.bits, &mut self.samples);
        ticker?;
        source?;
        output?;
        Ok(())
    }
}

impl<D, R, K> Session for Receiver<D, R, K>
where
    D: AnalogOutput,
    R: ByteSource,
    K: TickSource,
{
    fn mode(&self) -> LinkMode {
        LinkMode::Receiver
    }

    fn start(&mut self, config: &LinkConfig) -> LinkResult<()> {
        self.config = *config;
        self.bits.allocate(config.bit_capacity)?;
        self.samples.allocate(config.sample_capacity)?;
        self.decoder.start(&mut self.bits, &mut self.samples)?;
        self.bring_up()?;
        info!("receiver started");
        Ok(())
    }

    fn stop(&mut self) -> LinkResult<()> {
        let stopped = self.quiesce();
        self.bits.release();
        self.samples.release();
        debug!("receiver stopped");
        stopped
    }

    fn restart(&mut self) -> LinkResult<()> {
        if !self.decoder.is_started() {
            return Err(LinkError::NotStarted);
        }
        self.quiesce()?;
        if self.bits.is_allocated() {
            self.bits.reset();
        } else {
            self.bits.allocate(self.config.bit_capacity)?;
        }
        if self.samples.is_allocated() {
            self.samples.reset();
        } else {
            self.samples.allocate(self.config.sample_capacity)?;
        }
        self.decoder.restart(&mut self.bits, &mut self.samples)?;
        self.bring_up()?;
        info!("receiver restarted");
        Ok(())
    }

    fn handle(&mut self, event: Event) -> LinkResult<usize> {
        match event {
            Event::ByteReceived(byte) => self.on_byte(byte),
            Event::Tick => self.on_tick(),
            Event::SampleReady | Event::ByteSent => Ok(0),
        }
    }
}
