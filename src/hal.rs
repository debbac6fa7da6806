//! Hardware Abstraction Layer
//!
//! Binds the peripheral traits to the STM32F429ZI. Each peripheral is split
//! in two halves:
//! - a handle owned by the link session, implementing a `periph` trait with
//!   non-blocking calls
//! - an embassy task that owns the hardware, waits on requests from the handle
//!   and posts completions into the event channel
//!
//! Handle and task meet through a `'static` shared block of atomics and
//! signals created in `main`.

pub mod adc;
pub mod dac;
pub mod timer;
pub mod uart;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

use crate::config::EVENT_QUEUE_DEPTH;
use crate::link::Event;

/// Queue carrying peripheral completions to the link task
pub type EventChannel = Channel<CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH>;

/// Producer side of the event queue, held by driver tasks
pub type EventSender = Sender<'static, CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH>;

/// Consumer side of the event queue, held by the link task
pub type EventReceiver = Receiver<'static, CriticalSectionRawMutex, Event, EVENT_QUEUE_DEPTH>;
