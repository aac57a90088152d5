//! Azimuth - Acoustic Bearing Display Firmware
//!
//! Main firmware binary for an RP2040 board with a 1.14" ST7789 panel.
//! Each sensor node streams readings over its own UART; the firmware keeps
//! the latest reading per node and points an arrow at the loudest one.
//!
//! Named after the horizontal angle measured clockwise from north.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUartRx};
use embassy_time::{Duration, Instant, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use azimuth_core::scheduler::PollScheduler;
use azimuth_drivers::serial::UartLineSource;
use azimuth_hal::UartConfig;
use azimuth_hal_rp2040::uart::{to_embassy_config, RpUartRx, UartAllocator, UartId};

use crate::display::{panel_config, PanelCanvas, SPI_FREQUENCY_HZ};

mod config;
mod display;
mod report;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => BufferedInterruptHandler<UART1>;
});

/// Receive ring buffer per UART
const RX_BUF_SIZE: usize = 256;

/// How often the running counters are logged
const STATS_PERIOD: Duration = Duration::from_secs(10);

// Static cells for UART buffers (must live forever)
static RX_BUF0: StaticCell<[u8; RX_BUF_SIZE]> = StaticCell::new();
static RX_BUF1: StaticCell<[u8; RX_BUF_SIZE]> = StaticCell::new();

type NodeSource = UartLineSource<RpUartRx>;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Azimuth firmware starting...");

    let p = embassy_rp::init(Default::default());

    let config = config::load();
    let nodes = config.nodes.clone();

    // Setup SPI1 for the ST7789 panel
    let mut spi_config = spi::Config::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);

    let dc = Output::new(p.PIN_8, Level::Low);
    let cs = Output::new(p.PIN_9, Level::High);
    let rst = Output::new(p.PIN_12, Level::High);
    let mut panel = display::Panel::new(spi, dc, cs, rst, panel_config(&config.display));
    if config.display.backlight {
        panel = panel.with_backlight(Output::new(p.PIN_13, Level::Low));
    }
    let canvas: PanelCanvas = display::bring_up(panel, Output::new(p.PIN_6, Level::Low));

    let mut scheduler: PollScheduler<NodeSource, PanelCanvas> = PollScheduler::new(config, canvas);

    // Setup one receive-only UART per configured node
    // UART0: GPIO1 RX, UART1: GPIO5 RX (TX lines are unused)
    let mut uart0 = Some((p.UART0, p.PIN_1));
    let mut uart1 = Some((p.UART1, p.PIN_5));
    let mut allocator = UartAllocator::new();

    for node in &nodes {
        let uart_config = to_embassy_config(&UartConfig::with_baudrate(node.baudrate));

        let rx = match allocator.allocate(node.uart) {
            Ok(UartId::Uart0) => uart0.take().map(|(uart, pin)| {
                BufferedUartRx::new(uart, Irqs, pin, RX_BUF0.init([0u8; RX_BUF_SIZE]), uart_config)
            }),
            Ok(UartId::Uart1) => uart1.take().map(|(uart, pin)| {
                BufferedUartRx::new(uart, Irqs, pin, RX_BUF1.init([0u8; RX_BUF_SIZE]), uart_config)
            }),
            Err(e) => {
                error!("{}: UART{} unavailable: {}", node.id.as_str(), node.uart, e);
                None
            }
        };
        let Some(rx) = rx else {
            continue;
        };

        let source = UartLineSource::new(RpUartRx::new(rx));
        match scheduler.add_channel(&node.id, source) {
            Ok(()) => info!(
                "{} on UART{} @ {} baud, offset {}°",
                node.id.as_str(),
                node.uart,
                node.baudrate,
                node.offset_deg
            ),
            Err(e) => error!("{}: channel not added: {}", node.id.as_str(), e),
        }
    }

    if let Err(e) = scheduler.startup() {
        warn!("Startup paint failed: {}", e);
    }

    info!(
        "Polling {} channels every {}ms",
        scheduler.channels().len(),
        scheduler.interval_ms()
    );

    let pause = Duration::from_millis(u64::from(scheduler.interval_ms()));
    let mut last_stats = Instant::now();

    loop {
        let report = scheduler.run_cycle();
        report::log_cycle(&report);

        if last_stats.elapsed() >= STATS_PERIOD {
            report::log_stats(scheduler.stats());
            last_stats = Instant::now();
        }

        Timer::after(pause).await;
    }
}
