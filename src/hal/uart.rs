//! USART3 Transport
//!
//! The emitter hands bytes to `uart_tx_task` through a one-slot channel; the
//! task writes them with DMA and reports `ByteSent`. On the receiver,
//! `uart_rx_task` reads byte by byte and reports `ByteReceived` while
//! listening is enabled.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_stm32::mode::Async;
use embassy_stm32::usart::{UartRx, UartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embedded_io_async::Write;

use super::EventSender;
use crate::error::PeripheralError;
use crate::link::Event;
use crate::periph::{ByteSink, ByteSource, PeripheralResult};

/// State shared between [`SerialSink`] and [`uart_tx_task`]
pub struct TxShared {
    outgoing: Channel<CriticalSectionRawMutex, u8, 1>,
    fault: AtomicBool,
}

impl TxShared {
    /// Empty transmit slot
    #[must_use]
    pub const fn new() -> Self {
        Self {
            outgoing: Channel::new(),
            fault: AtomicBool::new(false),
        }
    }
}

impl Default for TxShared {
    fn default() -> Self {
        Self::new()
    }
}

/// Session-side transmit handle
pub struct SerialSink {
    shared: &'static TxShared,
}

impl SerialSink {
    /// Create a handle over the shared block
    #[must_use]
    pub const fn new(shared: &'static TxShared) -> Self {
        Self { shared }
    }
}

impl ByteSink for SerialSink {
    fn send_byte(&mut self, byte: u8) -> PeripheralResult {
        if self.shared.fault.swap(false, Ordering::AcqRel) {
            return Err(PeripheralError::Uart);
        }
        self.shared
            .outgoing
            .try_send(byte)
            .map_err(|_| PeripheralError::Busy)
    }
}

/// Write queued bytes and report `ByteSent`
///
/// A failed write still completes the byte so the emitter keeps draining; the
/// fault surfaces on the next `send_byte`.
#[embassy_executor::task]
pub async fn uart_tx_task(
    mut tx: UartTx<'static, Async>,
    shared: &'static TxShared,
    events: EventSender,
) {
    loop {
        let byte = shared.outgoing.receive().await;
        if tx.write_all(&[byte]).await.is_err() {
            error!("uart tx failed");
            shared.fault.store(true, Ordering::Release);
        }
        events.send(Event::ByteSent).await;
    }
}

/// State shared between [`SerialSource`] and [`uart_rx_task`]
pub struct RxShared {
    listening: AtomicBool,
}

impl RxShared {
    /// Receiver not listening
    #[must_use]
    pub const fn new() -> Self {
        Self {
            listening: AtomicBool::new(false),
        }
    }
}

impl Default for RxShared {
    fn default() -> Self {
        Self::new()
    }
}

/// Session-side receive gate
pub struct SerialSource {
    shared: &'static RxShared,
}

impl SerialSource {
    /// Create a handle over the shared block
    #[must_use]
    pub const fn new(shared: &'static RxShared) -> Self {
        Self { shared }
    }
}

impl ByteSource for SerialSource {
    fn start(&mut self) -> PeripheralResult {
        self.shared.listening.store(true, Ordering::Release);
        Ok(())
    }

    fn stop(&mut self) -> PeripheralResult {
        self.shared.listening.store(false, Ordering::Release);
        Ok(())
    }
}

/// Read bytes and report `ByteReceived`
///
/// Bytes arriving while the receiver is not listening are read and dropped so
/// the hardware never reports an overrun.
#[embassy_executor::task]
pub async fn uart_rx_task(
    mut rx: UartRx<'static, Async>,
    shared: &'static RxShared,
    events: EventSender,
) {
    let mut buf = [0u8; 1];
    loop {
        match rx.read(&mut buf).await {
            Ok(()) => {
                if shared.listening.load(Ordering::Acquire) {
                    events.send(Event::ByteReceived(buf[0])).await;
                }
            }
            Err(e) => warn!("uart rx error: {}", e),
        }
    }
}
