//! Emitter session
//!
//! ADC -> sample ring -> encoder -> bit ring -> UART. The tick requests a
//! conversion, the finished conversion is encoded, and the transmitter drains
//! the bit ring one byte per `ByteSent` completion.

use super::{Event, Session};
use crate::codec::Encoder;
use crate::config::LinkConfig;
use crate::error::{LinkError, LinkResult};
use crate::periph::{AnalogInput, ByteSink, TickSource};
use crate::ring::{BitRing, SampleRing};
use crate::types::{LinkMode, StreamState, Word};

/// Sampling side of the link
pub struct Emitter<A, T, K> {
    input: A,
    sink: T,
    ticker: K,
    samples: SampleRing,
    bits: BitRing,
    encoder: Encoder,
    config: LinkConfig,
}

impl<A, T, K> Emitter<A, T, K>
where
    A: AnalogInput,
    T: ByteSink,
    K: TickSource,
{
    /// Bind the peripherals; nothing runs until `start`
    pub const fn new(input: A, sink: T, ticker: K) -> Self {
        Self {
            input,
            sink,
            ticker,
            samples: SampleRing::new(),
            bits: BitRing::new(),
            encoder: Encoder::new(),
            config: LinkConfig::DEFAULT,
        }
    }

    /// Words waiting to be encoded
    pub fn samples(&self) -> &SampleRing {
        &self.samples
    }

    /// Bytes waiting to be transmitted
    pub fn bits(&self) -> &BitRing {
        &self.bits
    }

    /// Analog input binding
    pub fn input(&self) -> &A {
        &self.input
    }

    /// Transport binding
    pub fn sink(&self) -> &T {
        &self.sink
    }

    /// Tick binding
    pub fn ticker(&self) -> &K {
        &self.ticker
    }

    /// Hand the next byte to the transmitter unless one is in flight
    ///
    /// The byte leaves the ring only once the sink accepted it.
    fn pump_tx(&mut self) -> LinkResult<()> {
        if self.bits.state() == StreamState::Busy {
            return Ok(());
        }
        if let Some(byte) = self.bits.peek() {
            self.sink.send_byte(byte)?;
            self.bits.pop();
            self.bits.set_state(StreamState::Busy);
            trace!("tx {=u8:#x}", byte);
        }
        Ok(())
    }

    fn on_sample(&mut self) -> LinkResult<usize> {
        let word = Word::new(self.input.last_value());
        self.samples.push(word)?;

        let encoded = self.encoder.update(&mut self.samples, &mut self.bits);
        // Bytes encoded before a failure still go out
        let sent = self.pump_tx();
        let encoded = encoded?;
        sent?;
        Ok(encoded.words)
    }

    fn on_byte_sent(&mut self) -> LinkResult<usize> {
        if self.bits.state() == StreamState::Busy {
            self.bits.set_state(StreamState::Active);
        }
        self.pump_tx()?;
        Ok(0)
    }

    fn bring_up(&mut self) -> LinkResult<()> {
        self.input.start()?;
        self.pump_tx()?;
        self.ticker.start()?;
        Ok(())
    }

    fn quiesce(&mut self) -> LinkResult<()> {
        let ticker = self.ticker.stop();
        let input = self.input.stop();
        self.encoder.stop(&mut self.samples, &mut self.bits);
        ticker?;
        input?;
        Ok(())
    }
}

impl<A, T, K> Session for Emitter<A, T, K>
where
    A: AnalogInput,
    T: ByteSink,
    K: TickSource,
{
    fn mode(&self) -> LinkMode {
        LinkMode::Emitter
    }

    fn start(&mut self, config: &LinkConfig) -> LinkResult<()> {
        self.config = *config;
        self.samples.allocate(config.sample_capacity)?;
        self.bits.allocate(config.bit_capacity)?;
        self.encoder.start(&mut self.samples, &mut self.bits)?;
        self.bring_up()?;
        info!("emitter started");
        Ok(())
    }

    fn stop(&mut self) -> LinkResult<()> {
        let stopped = self.quiesce();
        self.samples.release();
        self.bits.release();
        debug!("emitter stopped");
        stopped
    }

    fn restart(&mut self) -> LinkResult<()> {
        if !self.encoder.is_started() {
            return Err(LinkError::NotStarted);
        }
        self.quiesce()?;
        if self.samples.is_allocated() {
            self.samples.reset();
        } else {
            self.samples.allocate(self.config.sample_capacity)?;
        }
        if self.bits.is_allocated() {
            self.bits.reset();
        } else {
            self.bits.allocate(self.config.bit_capacity)?;
        }
        self.encoder.restart(&mut self.samples, &mut self.bits)?;
        self.bring_up()?;
        info!("emitter restarted");
        Ok(())
    }

    fn handle(&mut self, event: Event) -> LinkResult<usize> {
        match event {
            Event::Tick => {
                self.input.convert()?;
                Ok(0)
            }
            Event::SampleReady => self.on_sample(),
            Event::ByteSent => self.on_byte_sent(),
            Event::ByteReceived(_) => Ok(0),
        }
    }
}
