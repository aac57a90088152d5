//! ST7789 TFT Display Driver
//!
//! Driver for ST7789-based RGB565 panels via 4-wire SPI (SCK, MOSI, CS, DC).
//! Small modules such as the 1.14" 135x240 only expose a window of the
//! controller's 240x320 RAM, so every address is shifted by the panel's
//! column and row offsets.
//!
//! There is no frame buffer: `embedded-graphics` primitives stream straight
//! to panel RAM, and solid fills use a single address window.

use embedded_graphics::pixelcolor::raw::{RawData, RawU16};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::backlight::{Backlight, BacklightError};

/// ST7789 commands
mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
}

/// COLMOD value for 16 bits per pixel
const COLMOD_RGB565: u8 = 0x55;

/// Pixels per SPI write during fills
const FILL_CHUNK: usize = 32;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum St7789Error {
    /// SPI transfer failed
    Spi,
    /// CS, DC or RST pin failed
    Pin,
}

/// Panel scan direction (MADCTL rotation bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    Portrait,
    Landscape,
    PortraitFlipped,
    LandscapeFlipped,
}

impl Orientation {
    const fn madctl(self) -> u8 {
        match self {
            Orientation::Portrait => 0x00,
            Orientation::Landscape => 0x60,
            Orientation::PortraitFlipped => 0xC0,
            Orientation::LandscapeFlipped => 0xA0,
        }
    }
}

/// Visible panel geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    /// Visible width after rotation
    pub width: u16,
    /// Visible height after rotation
    pub height: u16,
    /// Controller RAM column of the first visible column
    pub col_offset: u16,
    /// Controller RAM row of the first visible row
    pub row_offset: u16,
    pub orientation: Orientation,
    /// IPS panels need color inversion on
    pub invert: bool,
}

impl PanelConfig {
    /// Landscape panel with the given window into controller RAM
    pub const fn landscape(width: u16, height: u16, col_offset: u16, row_offset: u16) -> Self {
        Self {
            width,
            height,
            col_offset,
            row_offset,
            orientation: Orientation::Landscape,
            invert: true,
        }
    }
}

impl Default for PanelConfig {
    /// 1.14" 240x135 module
    fn default() -> Self {
        Self::landscape(240, 135, 40, 53)
    }
}

/// ST7789 TFT driver
pub struct St7789<SPI, DC, CS, RST, BL> {
    spi: SPI,
    dc: DC,
    cs: CS,
    rst: RST,
    backlight: Option<BL>,
    config: PanelConfig,
}

impl<SPI, DC, CS, RST, BL> St7789<SPI, DC, CS, RST, BL>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
{
    /// Create a new driver. Call [`St7789::init`] before drawing.
    pub fn new(spi: SPI, dc: DC, cs: CS, rst: RST, config: PanelConfig) -> Self {
        Self {
            spi,
            dc,
            cs,
            rst,
            backlight: None,
            config,
        }
    }

    /// Hand the backlight control line to the driver
    pub fn with_backlight(mut self, backlight: BL) -> Self {
        self.backlight = Some(backlight);
        self
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Hardware reset followed by the power-up sequence
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), St7789Error> {
        self.cs.set_high().map_err(|_| St7789Error::Pin)?;
        self.rst.set_low().map_err(|_| St7789Error::Pin)?;
        delay.delay_ms(10);
        self.rst.set_high().map_err(|_| St7789Error::Pin)?;
        delay.delay_ms(120);

        self.command(cmd::SWRESET, &[])?;
        delay.delay_ms(150);
        self.command(cmd::SLPOUT, &[])?;
        delay.delay_ms(10);
        self.command(cmd::COLMOD, &[COLMOD_RGB565])?;
        self.command(cmd::MADCTL, &[self.config.orientation.madctl()])?;
        let invert = if self.config.invert {
            cmd::INVON
        } else {
            cmd::INVOFF
        };
        self.command(invert, &[])?;
        self.command(cmd::NORON, &[])?;
        delay.delay_ms(10);
        self.command(cmd::DISPON, &[])?;
        delay.delay_ms(10);

        Ok(())
    }

    /// Send a command byte followed by optional parameter bytes
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), St7789Error> {
        self.cs.set_low().map_err(|_| St7789Error::Pin)?;
        let result = self.command_selected(command, params);
        self.cs.set_high().map_err(|_| St7789Error::Pin)?;
        result
    }

    fn command_selected(&mut self, command: u8, params: &[u8]) -> Result<(), St7789Error> {
        self.dc.set_low().map_err(|_| St7789Error::Pin)?;
        self.spi.write(&[command]).map_err(|_| St7789Error::Spi)?;
        if !params.is_empty() {
            self.dc.set_high().map_err(|_| St7789Error::Pin)?;
            self.spi.write(params).map_err(|_| St7789Error::Spi)?;
        }
        self.spi.flush().map_err(|_| St7789Error::Spi)
    }

    /// Set the RAM address window (inclusive, visible coordinates)
    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), St7789Error> {
        let (c0, c1) = (x0 + self.config.col_offset, x1 + self.config.col_offset);
        let (r0, r1) = (y0 + self.config.row_offset, y1 + self.config.row_offset);

        let [c0h, c0l] = c0.to_be_bytes();
        let [c1h, c1l] = c1.to_be_bytes();
        self.command(cmd::CASET, &[c0h, c0l, c1h, c1l])?;

        let [r0h, r0l] = r0.to_be_bytes();
        let [r1h, r1l] = r1.to_be_bytes();
        self.command(cmd::RASET, &[r0h, r0l, r1h, r1l])
    }

    /// Write `count` pixels of one color into the current window
    fn write_repeated(&mut self, color: Rgb565, count: u32) -> Result<(), St7789Error> {
        let [hi, lo] = RawU16::from(color).into_inner().to_be_bytes();
        let mut chunk = [0u8; FILL_CHUNK * 2];
        for px in chunk.chunks_exact_mut(2) {
            px[0] = hi;
            px[1] = lo;
        }

        self.cs.set_low().map_err(|_| St7789Error::Pin)?;
        let result = self.stream(&chunk, count as usize);
        self.cs.set_high().map_err(|_| St7789Error::Pin)?;
        result
    }

    /// RAMWR then `count` pixels taken from a pre-filled chunk
    fn stream(&mut self, chunk: &[u8], count: usize) -> Result<(), St7789Error> {
        self.command_selected(cmd::RAMWR, &[])?;
        self.dc.set_high().map_err(|_| St7789Error::Pin)?;
        let mut remaining = count;
        while remaining > 0 {
            let n = remaining.min(chunk.len() / 2);
            self.spi.write(&chunk[..n * 2]).map_err(|_| St7789Error::Spi)?;
            remaining -= n;
        }
        self.spi.flush().map_err(|_| St7789Error::Spi)
    }
}

impl<SPI, DC, CS, RST, BL> OriginDimensions for St7789<SPI, DC, CS, RST, BL> {
    fn size(&self) -> Size {
        Size::new(u32::from(self.config.width), u32::from(self.config.height))
    }
}

impl<SPI, DC, CS, RST, BL> DrawTarget for St7789<SPI, DC, CS, RST, BL>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
{
    type Color = Rgb565;
    type Error = St7789Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if !bounds.contains(point) {
                continue;
            }
            let (x, y) = (point.x as u16, point.y as u16);
            self.set_window(x, y, x, y)?;
            self.write_repeated(color, 1)?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        self.set_window(
            area.top_left.x as u16,
            area.top_left.y as u16,
            bottom_right.x as u16,
            bottom_right.y as u16,
        )?;
        self.write_repeated(color, area.size.width * area.size.height)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_solid(&self.bounding_box(), color)
    }
}

impl<SPI, DC, CS, RST, BL> Backlight for St7789<SPI, DC, CS, RST, BL>
where
    BL: OutputPin,
{
    fn set_backlight(&mut self, on: bool) -> Result<(), BacklightError> {
        let pin = self.backlight.as_mut().ok_or(BacklightError::NotWired)?;
        let result = if on { pin.set_high() } else { pin.set_low() };
        result.map_err(|_| BacklightError::Pin)
    }
}
