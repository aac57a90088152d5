//! Reading line parsing
//!
//! Validation order matters: callers treat [`ParseError::MissingMarker`] as
//! line noise (boot banners, debug prints from the node) and every other error
//! as a malformed reading.

use heapless::String;

/// Separator between the three fields of a reading line
pub const FIELD_SEPARATOR: char = ',';

/// Maximum node label length in bytes
pub const MAX_NODE_ID_LEN: usize = 8;

/// Node label as sent on the wire
pub type NodeLabel = String<MAX_NODE_ID_LEN>;

/// Reasons a line is not a usable reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line does not start with the node marker prefix
    MissingMarker,
    /// Wrong number of comma separated fields (count found)
    FieldCount(u8),
    /// Node label is not marker + alphanumerics, or too long
    InvalidLabel,
    /// Angle or amplitude is not a decimal number
    InvalidNumber,
    /// Angle or amplitude parsed as NaN
    NotANumber,
    /// Angle or amplitude parsed as infinity
    NotFinite,
}

/// A syntactically valid reading, still in the node's local frame
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawReading {
    /// Node label embedded in the line
    pub node: NodeLabel,
    /// Angle inside the node's field of view (degrees)
    pub angle_deg: f32,
    /// Signal amplitude (dB)
    pub amplitude_db: f32,
}

/// Check that `label` is `marker` followed by at least one `[A-Za-z0-9_]`
pub fn is_valid_label(label: &str, marker: &str) -> bool {
    if label.len() > MAX_NODE_ID_LEN {
        return false;
    }
    match label.strip_prefix(marker) {
        Some(suffix) => {
            !suffix.is_empty()
                && suffix
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_')
        }
        None => false,
    }
}

/// Parse one line into a [`RawReading`]
///
/// # Arguments
/// - `line`: one line without its terminator
/// - `marker`: node label prefix every valid line starts with
pub fn parse_line(line: &str, marker: &str) -> Result<RawReading, ParseError> {
    let line = line.trim();
    if !line.starts_with(marker) {
        return Err(ParseError::MissingMarker);
    }

    let mut fields = line.split(FIELD_SEPARATOR);
    let (Some(label), Some(angle), Some(amplitude), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        let count = line.split(FIELD_SEPARATOR).count();
        return Err(ParseError::FieldCount(count.min(u8::MAX as usize) as u8));
    };

    let label = label.trim();
    if !is_valid_label(label, marker) {
        return Err(ParseError::InvalidLabel);
    }
    let mut node = NodeLabel::new();
    node.push_str(label).map_err(|_| ParseError::InvalidLabel)?;

    let angle_deg = parse_value(angle)?;
    let amplitude_db = parse_value(amplitude)?;

    Ok(RawReading {
        node,
        angle_deg,
        amplitude_db,
    })
}

fn parse_value(field: &str) -> Result<f32, ParseError> {
    let value: f32 = field.trim().parse().map_err(|_| ParseError::InvalidNumber)?;
    if value.is_nan() {
        return Err(ParseError::NotANumber);
    }
    if value.is_infinite() {
        return Err(ParseError::NotFinite);
    }
    Ok(value)
}
