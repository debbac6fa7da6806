//! MicroW Link Firmware
//!
//! Entry point for the STM32F429ZI NUCLEO board. Brings up the clocks and
//! peripherals, spawns one driver task per peripheral and a link task that
//! owns the orchestrator. The `receiver` feature selects the direction.

#![no_std]
#![no_main]

use defmt::{error, info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_stm32::adc::Adc;
use embassy_stm32::dac::DacCh1;
use embassy_stm32::dma::NoDma;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::time::Hertz;
use embassy_stm32::usart::{self, Uart};
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_sync::channel::Channel;
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use microw::hal::adc::{adc_task, AdcShared, SampledInput};
use microw::hal::dac::HeldOutput;
use microw::hal::timer::{tick_task, SampleClock, TickHandle, TickShared};
use microw::hal::uart::{uart_rx_task, uart_tx_task, RxShared, SerialSink, SerialSource, TxShared};
use microw::hal::{EventChannel, EventReceiver};
use microw::prelude::*;

bind_interrupts!(struct Irqs {
    USART3 => usart::InterruptHandler<peripherals::USART3>;
});

type EmitterSession = Emitter<SampledInput, SerialSink, TickHandle>;
type ReceiverSession = Receiver<HeldOutput<'static>, SerialSource, TickHandle>;
type Firmware = Orchestrator<Link<EmitterSession, ReceiverSession>, Output<'static>, Delay>;

static EVENTS: EventChannel = Channel::new();
static ADC_SHARED: AdcShared = AdcShared::new();
static TICK_SHARED: TickShared = TickShared::new();
static TX_SHARED: TxShared = TxShared::new();
static RX_SHARED: RxShared = RxShared::new();
static FIRMWARE: StaticCell<Firmware> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("MicroW link v{} ({})", env!("CARGO_PKG_VERSION"), MODE);

    let p = embassy_stm32::init(clock_config());
    info!("Peripherals initialized");

    let led = Output::new(p.PB0, Level::Low, Speed::Low);

    let mut uart_config = usart::Config::default();
    uart_config.baudrate = UART_BAUD_RATE;
    let uart = unwrap!(Uart::new(
        p.USART3,
        p.PD9, // RX
        p.PD8, // TX
        Irqs,
        p.DMA1_CH3,
        p.DMA1_CH1,
        uart_config,
    ));
    let (uart_tx, uart_rx) = uart.split();
    info!("USART3 at {} baud", UART_BAUD_RATE);

    let events = EVENTS.sender();
    let ticker = TickHandle::new(&TICK_SHARED);
    unwrap!(spawner.spawn(tick_task(
        SampleClock::from_rate(SAMPLE_RATE_HZ),
        &TICK_SHARED,
        events
    )));

    let session = match MODE {
        LinkMode::Emitter => {
            let adc = Adc::new(p.ADC1);
            unwrap!(spawner.spawn(adc_task(adc, p.PA3, &ADC_SHARED, events)));
            unwrap!(spawner.spawn(uart_tx_task(uart_tx, &TX_SHARED, events)));
            Link::Emitter(Emitter::new(
                SampledInput::new(&ADC_SHARED),
                SerialSink::new(&TX_SHARED),
                ticker,
            ))
        }
        LinkMode::Receiver => {
            let dac = DacCh1::new(p.DAC1, NoDma, p.PA4);
            unwrap!(spawner.spawn(uart_rx_task(uart_rx, &RX_SHARED, events)));
            Link::Receiver(Receiver::new(
                HeldOutput::new(dac),
                SerialSource::new(&RX_SHARED),
                ticker,
            ))
        }
    };

    let firmware = FIRMWARE.init(Orchestrator::new(session, led, Delay, LinkConfig::default()));
    unwrap!(spawner.spawn(link_task(firmware, EVENTS.receiver())));
    info!("Tasks spawned");
}

/// 168 MHz SYSCLK from the 8 MHz ST-LINK clock
fn clock_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc::{
        AHBPrescaler, APBPrescaler, Hse, HseMode, Pll, PllMul, PllPDiv, PllPreDiv, PllQDiv,
        PllSource, Sysclk,
    };

    let mut config = embassy_stm32::Config::default();
    config.rcc.hse = Some(Hse {
        freq: Hertz(8_000_000),
        mode: HseMode::Bypass,
    });
    config.rcc.pll_src = PllSource::HSE;
    config.rcc.pll = Some(Pll {
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL168,
        divp: Some(PllPDiv::DIV2),
        divq: Some(PllQDiv::DIV7),
        divr: None,
    });
    config.rcc.ahb_pre = AHBPrescaler::DIV1;
    config.rcc.apb1_pre = APBPrescaler::DIV4;
    config.rcc.apb2_pre = APBPrescaler::DIV2;
    config.rcc.sys = Sysclk::PLL1_P;
    config
}

/// Own the orchestrator and feed it every peripheral event
#[embassy_executor::task]
async fn link_task(link: &'static mut Firmware, events: EventReceiver) {
    if let Err(e) = link.start() {
        error!("link failed to start: {}", e);
        return;
    }

    let mut state = link.state();
    loop {
        let event = events.receive().await;
        let next = link.handle(event);
        if next != state {
            match next {
                LinkState::Halted => error!("link halted, last error {}", link.last_error()),
                LinkState::Stopped => warn!("link stopped, last error {}", link.last_error()),
                LinkState::Starting | LinkState::Running => info!("link {}", next),
            }
            state = next;
        }
    }
}
