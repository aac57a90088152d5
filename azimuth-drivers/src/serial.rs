//! UART line source
//!
//! Drains a node's UART one byte at a time into a [`LineAssembler`]. Bytes
//! are only read while the UART reports them ready, so a silent node costs
//! a single readiness check per poll.

use azimuth_core::traits::{LineSource, SourceError};
use azimuth_hal::UartRx;
use azimuth_protocol::{Feed, LineAssembler, LineError, MAX_LINE_LEN};

/// Bytes consumed per poll before yielding to the next channel
pub const DEFAULT_BYTE_BUDGET: usize = 2 * (MAX_LINE_LEN + 2);

/// Line source over a UART receiver
pub struct UartLineSource<R> {
    rx: R,
    assembler: LineAssembler,
    byte_budget: usize,
}

impl<R: UartRx> UartLineSource<R> {
    /// Create a line source with the default byte budget
    pub fn new(rx: R) -> Self {
        Self::with_budget(rx, DEFAULT_BYTE_BUDGET)
    }

    /// Create a line source reading at most `byte_budget` bytes per poll
    pub fn with_budget(rx: R, byte_budget: usize) -> Self {
        Self {
            rx,
            assembler: LineAssembler::new(),
            byte_budget: byte_budget.max(1),
        }
    }

    /// Bytes of the line currently being assembled
    pub fn pending_len(&self) -> usize {
        self.assembler.pending_len()
    }

    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.rx
    }

    /// Read up to the byte budget; true once a line is complete
    fn fill(&mut self) -> Result<bool, SourceError> {
        for _ in 0..self.byte_budget {
            if !self.rx.read_ready().map_err(|_| SourceError::Io)? {
                return Ok(false);
            }
            let byte = self.rx.read_byte().map_err(|_| SourceError::Io)?;
            match self.assembler.feed(byte) {
                Feed::Pending => {}
                Feed::Complete => return Ok(true),
                Feed::Overflowed => return Err(SourceError::LineTooLong),
            }
        }
        Ok(false)
    }
}

impl<R: UartRx> LineSource for UartLineSource<R> {
    fn poll_line(&mut self) -> Result<Option<&str>, SourceError> {
        match self.fill() {
            Ok(true) => {}
            Ok(false) => return Ok(None),
            Err(e) => {
                self.assembler.reset();
                return Err(e);
            }
        }

        match self.assembler.line() {
            Ok(line) => Ok(Some(line)),
            Err(LineError::InvalidUtf8) => Err(SourceError::InvalidUtf8),
            Err(_) => Ok(None),
        }
    }
}
