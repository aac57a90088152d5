//! Sensor node line protocol
//!
//! This crate defines the ASCII protocol spoken by each sensor node over its
//! UART. Every node streams one reading per line:
//!
//! ```text
//! <node_id>,<angle_degrees>,<amplitude_db>\n
//! esp1,10.5,-32.0
//! ```
//!
//! - `node_id`: node label, marker prefix (e.g. `esp`) plus alphanumerics
//! - `angle_degrees`: bearing inside the node's own 180° field of view
//! - `amplitude_db`: signal strength, any sign
//!
//! Bytes are assembled into lines by [`LineAssembler`], and each line is
//! validated into a [`RawReading`] by [`parse_line`]. Whether the node is
//! actually configured is decided by the consumer, not by this crate.

#![no_std]
#![deny(unsafe_code)]

pub mod line;
pub mod reading;

pub use line::{Feed, LineAssembler, LineError, MAX_LINE_LEN};
pub use reading::{is_valid_label, parse_line, NodeLabel, ParseError, RawReading, FIELD_SEPARATOR, MAX_NODE_ID_LEN};
