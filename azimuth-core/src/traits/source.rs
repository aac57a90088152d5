//! Line source trait for sensor node channels

/// Errors a channel can report while producing a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SourceError {
    /// Transport fault (overrun, framing, break)
    Io,
    /// Line exceeded the line buffer and was dropped
    LineTooLong,
    /// Line bytes are not UTF-8
    InvalidUtf8,
}

/// A channel delivering newline-terminated text from one sensor node
///
/// Implementations must never block: a channel with no complete line
/// returns `Ok(None)` immediately so the poll loop can move on.
pub trait LineSource {
    /// Return the next complete line, if one is ready
    ///
    /// The returned line is valid until the next call. After an error the
    /// source discards any partial line and resynchronizes on the next
    /// newline.
    fn poll_line(&mut self) -> Result<Option<&str>, SourceError>;
}
