//! ST7789 panel bring-up
//!
//! Pin assignments match the Pico 1.14" LCD carrier:
//! SPI1 CLK=GPIO10, MOSI=GPIO11, DC=GPIO8, CS=GPIO9, RST=GPIO12, BL=GPIO13.
//! GPIO6 is a fallback backlight line for carriers that route it elsewhere.

use azimuth_core::config::DisplayConfig;
use azimuth_display::GraphicsCanvas;
use azimuth_drivers::display::{activate_backlight, BacklightPath, GpioBacklight, PanelConfig, St7789};
use defmt::*;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI1;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::Delay;

/// SPI clock for the panel
pub const SPI_FREQUENCY_HZ: u32 = 62_500_000;

/// Concrete panel type on this board
pub type Panel = St7789<Spi<'static, SPI1, Blocking>, Output<'static>, Output<'static>, Output<'static>, Output<'static>>;

/// Canvas the scheduler draws on
pub type PanelCanvas = GraphicsCanvas<Panel>;

/// Map display settings to the panel's RAM window
pub fn panel_config(display: &DisplayConfig) -> PanelConfig {
    PanelConfig::landscape(
        display.width,
        display.height,
        display.col_offset,
        display.row_offset,
    )
}

/// Initialize the panel and switch its backlight on
///
/// Failures are logged, not fatal: the poll loop still runs and repaints
/// keep being retried.
pub fn bring_up(mut panel: Panel, fallback_backlight: Output<'static>) -> PanelCanvas {
    match panel.init(&mut Delay) {
        Ok(()) => info!("ST7789 initialized"),
        Err(e) => error!("ST7789 init failed: {}", e),
    }

    let mut fallback = GpioBacklight::new(fallback_backlight);
    match activate_backlight(&mut panel, &mut fallback) {
        Ok(BacklightPath::Panel) => info!("Backlight on (panel pin)"),
        Ok(BacklightPath::Fallback) => warn!("Backlight on via fallback GPIO6"),
        Err(e) => error!("Backlight unavailable: {}", e),
    }

    GraphicsCanvas::new(panel)
}
