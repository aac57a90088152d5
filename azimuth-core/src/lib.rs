//! Board-agnostic fusion logic for the bearing display firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Configuration types and the `nodes.toml` parser
//! - Bearing normalization into the shared compass frame
//! - Reading store (latest reading per node) and strongest-signal selection
//! - Line ingestion (protocol parse + node table lookup)
//! - Line source trait for node channels
//! - Poll scheduler tying ingestion, selection and rendering together

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bearing;
pub mod config;
pub mod ingest;
pub mod scheduler;
pub mod selector;
pub mod store;
pub mod traits;

pub use bearing::{normalize, wrap_degrees, Reading};
pub use config::{parse_config, ConfigError, NodeConfig, NodeId, SystemConfig, MAX_NODES};
pub use ingest::{ingest, IngestError, Ingested};
pub use scheduler::{ChannelOutcome, ChannelReport, CycleReport, CycleStats, NodeChannel, PollScheduler};
pub use selector::{select, select_entry};
pub use store::{ReadingStore, StoreError};
pub use traits::{LineSource, SourceError};
