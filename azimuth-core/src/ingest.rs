//! Line ingestion
//!
//! Turns one protocol line into a reading in the global frame, using the
//! node table from the configuration. Nothing here touches the store; the
//! scheduler decides what to do with the result.

use azimuth_protocol::{parse_line, ParseError};

use crate::bearing::Reading;
use crate::config::{NodeId, SystemConfig};

/// Why a line did not become a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IngestError {
    /// Line failed protocol validation
    Parse(ParseError),
    /// Well-formed line from a node that is not configured
    UnknownNode,
    /// Offset plus angle overflowed to a non-finite bearing
    OutOfRange,
}

impl From<ParseError> for IngestError {
    fn from(e: ParseError) -> Self {
        IngestError::Parse(e)
    }
}

impl IngestError {
    /// True for lines that are not readings at all (boot banners, debug prints)
    pub fn is_noise(&self) -> bool {
        matches!(self, IngestError::Parse(ParseError::MissingMarker))
    }
}

/// A validated reading and the node it came from
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ingested {
    pub node: NodeId,
    pub reading: Reading,
}

/// Parse `line` and rotate it into the global frame
pub fn ingest(line: &str, config: &SystemConfig) -> Result<Ingested, IngestError> {
    let raw = parse_line(line, config.node_prefix())?;
    let offset = config
        .offset_for(&raw.node)
        .ok_or(IngestError::UnknownNode)?;
    let reading = Reading::from_local(offset, raw.angle_deg, raw.amplitude_db)
        .ok_or(IngestError::OutOfRange)?;

    Ok(Ingested {
        node: raw.node,
        reading,
    })
}
