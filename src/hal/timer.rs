//! Sample Clock
//!
//! Periodic tick at `SAMPLE_RATE_HZ` driving ADC conversions on the emitter
//! and DAC updates on the receiver.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_time::{Duration, Ticker};

use super::EventSender;
use crate::link::Event;
use crate::periph::{PeripheralResult, TickSource};

/// Periodic timer for sample rate generation
#[derive(Clone, Copy, Debug)]
pub struct SampleClock {
    /// Period between samples in microseconds
    period_us: u32,
}

impl SampleClock {
    /// Create a sample clock from sample rate
    #[must_use]
    pub const fn from_rate(sample_rate: u32) -> Self {
        Self {
            period_us: 1_000_000 / sample_rate,
        }
    }

    /// Get the sample rate in Hz
    #[must_use]
    pub const fn rate_hz(&self) -> u32 {
        1_000_000 / self.period_us
    }

    /// Get period duration
    #[must_use]
    pub const fn period(&self) -> Duration {
        Duration::from_micros(self.period_us as u64)
    }
}

impl defmt::Format for SampleClock {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "SampleClock({}Hz)", self.rate_hz());
    }
}

/// State shared between [`TickHandle`] and [`tick_task`]
pub struct TickShared {
    enabled: AtomicBool,
    /// Ticks lost because the event queue was full
    missed: AtomicU32,
}

impl TickShared {
    /// Stopped clock
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            missed: AtomicU32::new(0),
        }
    }

    /// Ticks dropped so far
    pub fn missed(&self) -> u32 {
        self.missed.load(Ordering::Relaxed)
    }
}

impl Default for TickShared {
    fn default() -> Self {
        Self::new()
    }
}

/// Session-side tick gate
pub struct TickHandle {
    shared: &'static TickShared,
}

impl TickHandle {
    /// Create a handle over the shared block
    #[must_use]
    pub const fn new(shared: &'static TickShared) -> Self {
        Self { shared }
    }
}

impl TickSource for TickHandle {
    fn start(&mut self) -> PeripheralResult {
        self.shared.enabled.store(true, Ordering::Release);
        Ok(())
    }

    fn stop(&mut self) -> PeripheralResult {
        self.shared.enabled.store(false, Ordering::Release);
        Ok(())
    }
}

/// Post `Tick` every period while enabled
///
/// Ticks never wait on the queue; a late link task loses ticks instead of
/// skewing the clock.
#[embassy_executor::task]
pub async fn tick_task(clock: SampleClock, shared: &'static TickShared, events: EventSender) {
    let mut ticker = Ticker::every(clock.period());
    loop {
        ticker.next().await;
        if !shared.enabled.load(Ordering::Acquire) {
            continue;
        }
        if events.try_send(Event::Tick).is_err() {
            let missed = shared.missed.fetch_add(1, Ordering::Relaxed) + 1;
            if missed.is_power_of_two() {
                warn!("{=u32} ticks missed", missed);
            }
        }
    }
}
