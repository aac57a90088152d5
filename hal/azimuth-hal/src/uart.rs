//! UART serial communication abstractions
//!
//! Sensor nodes only ever talk to us, so only the receive half is modelled.
//! The poll loop must never stall on a quiet node, which is why readiness is
//! a separate query from the read itself.

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Check whether at least one byte can be read without blocking
    fn read_ready(&mut self) -> Result<bool, Self::Error>;

    /// Read data from the UART
    ///
    /// Blocks until at least one byte is available, then returns the number
    /// of bytes copied into `buf`. Only call after [`UartRx::read_ready`]
    /// returned `true` to keep the caller non-blocking.
    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Read a single byte from the UART
    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.read_blocking(&mut buf)?;
        Ok(buf[0])
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl UartConfig {
    /// 8N1 at the given baud rate
    pub fn with_baudrate(baudrate: u32) -> Self {
        Self {
            baudrate,
            ..Self::default()
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

/// UART allocation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// Peripheral index does not exist on this chip
    NoSuchUart,
    /// Peripheral already claimed by another node
    InUse,
}

/// Tracks which of a chip's `N` UART peripherals are claimed
#[derive(Debug)]
pub struct UartAllocator<const N: usize> {
    allocated: [bool; N],
}

impl<const N: usize> Default for UartAllocator<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> UartAllocator<N> {
    pub const fn new() -> Self {
        Self {
            allocated: [false; N],
        }
    }

    /// Claim the UART with the given peripheral index
    pub fn allocate(&mut self, index: u8) -> Result<u8, UartError> {
        let slot = self
            .allocated
            .get_mut(usize::from(index))
            .ok_or(UartError::NoSuchUart)?;
        if *slot {
            return Err(UartError::InUse);
        }
        *slot = true;
        Ok(index)
    }
}
