//! Configuration loading
//!
//! `nodes.toml` is compiled into the image and checked by build.rs, so the
//! fallback only runs if the embedded parser and the build check disagree.

use azimuth_core::config::{parse_config, NodeConfig, NodeId, SystemConfig, DEFAULT_BAUDRATE};
use defmt::*;

/// Embedded node configuration (compiled into firmware)
/// Edit nodes.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../nodes.toml");

/// Two back-to-back nodes: esp1 facing east on UART1, esp2 facing west on UART0
const FALLBACK_NODES: [(&str, f32, u8); 2] = [("esp1", 90.0, 1), ("esp2", 270.0, 0)];

/// Parse the embedded configuration, falling back to the built-in one
pub fn load() -> SystemConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Loaded nodes.toml: {} nodes, prefix '{}', poll every {}ms",
                config.nodes.len(),
                config.node_prefix(),
                config.poll.interval_ms
            );
            config
        }
        Err(e) => {
            error!("nodes.toml rejected ({}), using fallback config", e);
            fallback()
        }
    }
}

/// Minimal built-in configuration
pub fn fallback() -> SystemConfig {
    let mut config = SystemConfig::new();
    for (id, offset_deg, uart) in FALLBACK_NODES {
        let mut label = NodeId::new();
        if label.push_str(id).is_err() {
            continue;
        }
        let node = NodeConfig {
            id: label,
            offset_deg,
            uart,
            baudrate: DEFAULT_BAUDRATE,
        };
        if let Err(e) = config.add_node(node) {
            warn!("Fallback node {} skipped: {}", id, e);
        }
    }
    config
}
