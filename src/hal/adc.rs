//! ADC Driver
//!
//! Single conversions on ADC1 (PA3), one per sample tick. The conversion runs
//! in `adc_task`; the handle only requests it and reads back the result.

use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use embassy_stm32::adc::{Adc, SampleTime};
use embassy_stm32::peripherals::{ADC1, PA3};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use super::EventSender;
use crate::error::PeripheralError;
use crate::link::Event;
use crate::periph::{AnalogInput, PeripheralResult};

/// State shared between [`SampledInput`] and [`adc_task`]
pub struct AdcShared {
    request: Signal<CriticalSectionRawMutex, ()>,
    value: AtomicU16,
    enabled: AtomicBool,
    busy: AtomicBool,
}

impl AdcShared {
    /// Idle, disabled converter
    #[must_use]
    pub const fn new() -> Self {
        Self {
            request: Signal::new(),
            value: AtomicU16::new(0),
            enabled: AtomicBool::new(false),
            busy: AtomicBool::new(false),
        }
    }
}

impl Default for AdcShared {
    fn default() -> Self {
        Self::new()
    }
}

/// Session-side ADC handle
pub struct SampledInput {
    shared: &'static AdcShared,
}

impl SampledInput {
    /// Create a handle over the shared block
    #[must_use]
    pub const fn new(shared: &'static AdcShared) -> Self {
        Self { shared }
    }
}

impl AnalogInput for SampledInput {
    fn start(&mut self) -> PeripheralResult {
        self.shared.busy.store(false, Ordering::Release);
        self.shared.enabled.store(true, Ordering::Release);
        Ok(())
    }

    fn stop(&mut self) -> PeripheralResult {
        self.shared.enabled.store(false, Ordering::Release);
        self.shared.request.reset();
        Ok(())
    }

    fn convert(&mut self) -> PeripheralResult {
        if !self.shared.enabled.load(Ordering::Acquire) {
            return Err(PeripheralError::Adc);
        }
        if self.shared.busy.swap(true, Ordering::AcqRel) {
            return Err(PeripheralError::Busy);
        }
        self.shared.request.signal(());
        Ok(())
    }

    fn last_value(&self) -> u16 {
        self.shared.value.load(Ordering::Acquire)
    }
}

/// Run conversions on request and report `SampleReady`
#[embassy_executor::task]
pub async fn adc_task(
    mut adc: Adc<'static, ADC1>,
    mut pin: PA3,
    shared: &'static AdcShared,
    events: EventSender,
) {
    adc.set_sample_time(SampleTime::CYCLES112);
    loop {
        shared.request.wait().await;
        let raw = adc.blocking_read(&mut pin);
        shared.value.store(raw, Ordering::Release);
        shared.busy.store(false, Ordering::Release);
        if shared.enabled.load(Ordering::Acquire) {
            events.send(Event::SampleReady).await;
        }
    }
}
