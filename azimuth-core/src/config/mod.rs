//! Configuration types and `nodes.toml` parsing
//!
//! Configuration is read once at boot and is immutable afterwards.

pub mod toml;
pub mod types;

pub use toml::parse_config;
pub use types::*;
