//! UART peripherals
//!
//! RP2040 has two UART peripherals (UART0 and UART1). Each sensor node
//! owns one of them for receive only.

use azimuth_hal::uart::{DataBits, Parity, StopBits};
use azimuth_hal::{UartConfig, UartError, UartRx};
use embassy_rp::uart::{self, BufferedUartRx};

/// UART peripheral identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartId {
    Uart0,
    Uart1,
}

impl UartId {
    /// Map a configured peripheral index to a UART
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(UartId::Uart0),
            1 => Some(UartId::Uart1),
            _ => None,
        }
    }
}

/// UART allocation state for the two RP2040 UARTs
#[derive(Debug, Default)]
pub struct UartAllocator {
    inner: azimuth_hal::UartAllocator<2>,
}

impl UartAllocator {
    pub const fn new() -> Self {
        Self {
            inner: azimuth_hal::UartAllocator::new(),
        }
    }

    /// Claim the UART with the given configured index
    pub fn allocate(&mut self, index: u8) -> Result<UartId, UartError> {
        let index = self.inner.allocate(index)?;
        UartId::from_index(index).ok_or(UartError::NoSuchUart)
    }
}

/// Convert a board-agnostic UART config into the embassy-rp one
pub fn to_embassy_config(config: &UartConfig) -> uart::Config {
    let mut out = uart::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    out.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    out
}

/// Receive half of an interrupt-driven buffered UART
///
/// The interrupt handler fills the ring buffer in the background, so
/// readiness checks and reads from the poll loop never wait on the wire.
pub struct RpUartRx {
    rx: BufferedUartRx,
}

impl RpUartRx {
    pub fn new(rx: BufferedUartRx) -> Self {
        Self { rx }
    }
}

impl UartRx for RpUartRx {
    type Error = uart::Error;

    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        embedded_io::ReadReady::read_ready(&mut self.rx)
    }

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        embedded_io::Read::read(&mut self.rx, buf)
    }
}
