//! Line assembly for the node protocol.
//!
//! UART bytes arrive in arbitrary chunks. The assembler accumulates them into
//! one fixed buffer and reports when a newline completes a line. The buffer is
//! reused for every line, so a node that streams forever never grows memory.
//!
//! - A trailing `\r` is stripped (nodes may send CRLF)
//! - Empty lines are skipped silently
//! - A line longer than [`MAX_LINE_LEN`] is dropped up to its newline

use heapless::Vec;

/// Maximum line length in bytes (excluding the newline)
pub const MAX_LINE_LEN: usize = 64;

/// Line terminator
const LINE_END: u8 = b'\n';

/// Optional terminator prefix
const CARRIAGE_RETURN: u8 = b'\r';

/// Errors reported for an assembled line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// No complete line is buffered
    Incomplete,
    /// Line exceeded [`MAX_LINE_LEN`] and was discarded
    TooLong,
    /// Line is not valid UTF-8
    InvalidUtf8,
}

/// Result of feeding one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Feed {
    /// More bytes needed
    Pending,
    /// A line is complete and available via [`LineAssembler::line`]
    Complete,
    /// An overlong line just ended and was thrown away
    Overflowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssembleState {
    /// Accumulating bytes of a line
    Collecting,
    /// Holding a complete line until the next byte arrives
    Complete,
    /// Skipping the rest of an overlong line
    Discarding,
}

/// Byte-to-line state machine
#[derive(Debug, Clone)]
pub struct LineAssembler {
    state: AssembleState,
    buffer: Vec<u8, MAX_LINE_LEN>,
    /// A `\r` was seen but not yet stored; it only counts if a byte other
    /// than the newline follows
    held_cr: bool,
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl LineAssembler {
    /// Create an empty assembler
    pub const fn new() -> Self {
        Self {
            state: AssembleState::Collecting,
            buffer: Vec::new(),
            held_cr: false,
        }
    }

    /// Drop any partial line and start over
    pub fn reset(&mut self) {
        self.state = AssembleState::Collecting;
        self.buffer.clear();
        self.held_cr = false;
    }

    /// Feed a single byte
    ///
    /// A completed line stays readable until the next call to `feed`.
    pub fn feed(&mut self, byte: u8) -> Feed {
        if self.state == AssembleState::Complete {
            self.reset();
        }

        match self.state {
            AssembleState::Collecting => {
                if byte == LINE_END {
                    self.held_cr = false;
                    if self.buffer.is_empty() {
                        return Feed::Pending;
                    }
                    self.state = AssembleState::Complete;
                    return Feed::Complete;
                }
                if core::mem::replace(&mut self.held_cr, false) {
                    self.store(CARRIAGE_RETURN);
                }
                if byte == CARRIAGE_RETURN && self.state == AssembleState::Collecting {
                    self.held_cr = true;
                } else {
                    self.store(byte);
                }
                Feed::Pending
            }
            AssembleState::Discarding => {
                if byte == LINE_END {
                    self.state = AssembleState::Collecting;
                    Feed::Overflowed
                } else {
                    Feed::Pending
                }
            }
            // Handled by the reset above
            AssembleState::Complete => Feed::Pending,
        }
    }

    /// Append to the line, switching to discard mode once it overflows
    fn store(&mut self, byte: u8) {
        if self.state != AssembleState::Collecting {
            return;
        }
        if self.buffer.push(byte).is_err() {
            self.buffer.clear();
            self.state = AssembleState::Discarding;
        }
    }

    /// The most recently completed line
    pub fn line(&self) -> Result<&str, LineError> {
        if self.state != AssembleState::Complete {
            return Err(LineError::Incomplete);
        }
        core::str::from_utf8(&self.buffer).map_err(|_| LineError::InvalidUtf8)
    }

    /// Number of bytes buffered for the line in progress
    pub fn pending_len(&self) -> usize {
        match self.state {
            AssembleState::Collecting => self.buffer.len() + usize::from(self.held_cr),
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(assembler: &mut LineAssembler, bytes: &[u8]) -> Feed {
        let mut last = Feed::Pending;
        for &b in bytes {
            last = assembler.feed(b);
        }
        last
    }

    #[test]
    fn test_complete_line() {
        let mut asm = LineAssembler::new();
        assert_eq!(feed_all(&mut asm, b"esp1,10,30\n"), Feed::Complete);
        assert_eq!(asm.line(), Ok("esp1,10,30"));
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut asm = LineAssembler::new();
        assert_eq!(feed_all(&mut asm, b"esp2,1"), Feed::Pending);
        assert_eq!(asm.line(), Err(LineError::Incomplete));
        assert_eq!(asm.pending_len(), 6);
        assert_eq!(feed_all(&mut asm, b"5,-3\n"), Feed::Complete);
        assert_eq!(asm.line(), Ok("esp2,15,-3"));
    }

    #[test]
    fn test_crlf_stripped() {
        let mut asm = LineAssembler::new();
        assert_eq!(feed_all(&mut asm, b"esp1,0,0\r\n"), Feed::Complete);
        assert_eq!(asm.line(), Ok("esp1,0,0"));
    }

    #[test]
    fn test_empty_lines_skipped() {
        let mut asm = LineAssembler::new();
        assert_eq!(feed_all(&mut asm, b"\n\r\n\n"), Feed::Pending);
        assert_eq!(feed_all(&mut asm, b"x\n"), Feed::Complete);
        assert_eq!(asm.line(), Ok("x"));
    }

    #[test]
    fn test_buffer_reused_for_next_line() {
        let mut asm = LineAssembler::new();
        feed_all(&mut asm, b"esp1,10,30\n");
        assert_eq!(feed_all(&mut asm, b"esp2,5,1\n"), Feed::Complete);
        assert_eq!(asm.line(), Ok("esp2,5,1"));
    }

    #[test]
    fn test_overlong_line_discarded() {
        let mut asm = LineAssembler::new();
        let long = [b'a'; MAX_LINE_LEN + 10];
        assert_eq!(feed_all(&mut asm, &long), Feed::Pending);
        assert_eq!(asm.feed(b'\n'), Feed::Overflowed);
        assert_eq!(asm.line(), Err(LineError::Incomplete));

        // Recovers on the following line
        assert_eq!(feed_all(&mut asm, b"esp1,1,2\n"), Feed::Complete);
        assert_eq!(asm.line(), Ok("esp1,1,2"));
    }

    #[test]
    fn test_line_at_capacity_accepted() {
        let mut asm = LineAssembler::new();
        let exact = [b'b'; MAX_LINE_LEN];
        feed_all(&mut asm, &exact);
        assert_eq!(asm.feed(b'\n'), Feed::Complete);
        assert_eq!(asm.line().map(str::len), Ok(MAX_LINE_LEN));
    }

    #[test]
    fn test_line_at_capacity_with_crlf_accepted() {
        let mut asm = LineAssembler::new();
        let exact = [b'b'; MAX_LINE_LEN];
        feed_all(&mut asm, &exact);
        assert_eq!(feed_all(&mut asm, b"\r\n"), Feed::Complete);
        assert_eq!(asm.line().map(str::len), Ok(MAX_LINE_LEN));
    }

    #[test]
    fn test_line_over_capacity_with_inner_cr_discarded() {
        let mut asm = LineAssembler::new();
        let exact = [b'b'; MAX_LINE_LEN];
        feed_all(&mut asm, &exact);
        // The CR is real data here, so the line no longer fits
        assert_eq!(feed_all(&mut asm, b"\rx\n"), Feed::Overflowed);
    }

    #[test]
    fn test_inner_cr_kept() {
        let mut asm = LineAssembler::new();
        assert_eq!(feed_all(&mut asm, b"a\rb\r\r\n"), Feed::Complete);
        assert_eq!(asm.line(), Ok("a\rb\r"));
    }

    #[test]
    fn test_invalid_utf8() {
        let mut asm = LineAssembler::new();
        assert_eq!(feed_all(&mut asm, &[0xFF, 0xFE, b'\n']), Feed::Complete);
        assert_eq!(asm.line(), Err(LineError::InvalidUtf8));
    }

    #[test]
    fn test_reset_drops_partial() {
        let mut asm = LineAssembler::new();
        feed_all(&mut asm, b"esp1,4");
        asm.reset();
        assert_eq!(feed_all(&mut asm, b"2\n"), Feed::Complete);
        assert_eq!(asm.line(), Ok("2"));
    }
}
