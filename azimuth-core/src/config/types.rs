//! Configuration type definitions
//!
//! These types represent the system configuration. Configuration is fixed
//! at startup and never changes while the poll loop runs.

use heapless::{String, Vec};

use azimuth_protocol::{is_valid_label, NodeLabel, MAX_NODE_ID_LEN};

/// Maximum number of sensor nodes
pub const MAX_NODES: usize = 4;

/// Node identifier
pub type NodeId = NodeLabel;

/// Default node label marker
pub const DEFAULT_NODE_PREFIX: &str = "esp";

/// Default poll loop pause (ms)
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 50;

/// Default node baud rate
pub const DEFAULT_BAUDRATE: u32 = 115_200;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Invalid section header
    InvalidSection,
    /// Key not known in its section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Required key missing from a node section
    MissingKey,
    /// More than [`MAX_NODES`] nodes
    TooManyNodes,
    /// Same node declared twice
    DuplicateNode,
    /// Node label does not match the marker prefix format
    InvalidNodeId,
    /// Heading offset outside [0, 360)
    OffsetOutOfRange,
    /// Two nodes assigned to the same UART
    UartConflict,
    /// No nodes configured
    NoNodes,
    /// Display too small to draw the arrow
    InvalidDisplaySize,
}

/// One sensor node
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeConfig {
    /// Label the node puts at the start of every line
    pub id: NodeId,
    /// Heading of the node's 0° in the global frame (degrees)
    pub offset_deg: f32,
    /// UART peripheral index the node is wired to
    pub uart: u8,
    /// Baud rate
    pub baudrate: u32,
}

/// Line protocol settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProtocolConfig {
    /// Prefix every node label starts with
    pub node_prefix: String<MAX_NODE_ID_LEN>,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        let mut node_prefix = String::new();
        let _ = node_prefix.push_str(DEFAULT_NODE_PREFIX);
        Self { node_prefix }
    }
}

/// Poll loop settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollConfig {
    /// Pause between poll cycles (ms)
    pub interval_ms: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// Display hardware settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Visible width in pixels (after rotation)
    pub width: u16,
    /// Visible height in pixels (after rotation)
    pub height: u16,
    /// Panel RAM column offset of the visible area
    pub col_offset: u16,
    /// Panel RAM row offset of the visible area
    pub row_offset: u16,
    /// Draw the arrowhead filled instead of outlined
    pub filled_head: bool,
    /// Panel exposes a backlight control line
    pub backlight: bool,
}

impl Default for DisplayConfig {
    /// 1.14" 240x135 ST7789 module in landscape
    fn default() -> Self {
        Self {
            width: 240,
            height: 135,
            col_offset: 40,
            row_offset: 53,
            filled_head: false,
            backlight: true,
        }
    }
}

/// Smallest display side that still fits an arrow
const MIN_DISPLAY_SIDE: u16 = 64;

/// Complete system configuration
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemConfig {
    pub protocol: ProtocolConfig,
    pub poll: PollConfig,
    pub display: DisplayConfig,
    /// Nodes in poll order
    pub nodes: Vec<NodeConfig, MAX_NODES>,
}

impl SystemConfig {
    /// Create an empty configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a node by label
    pub fn find_node(&self, id: &str) -> Option<&NodeConfig> {
        self.nodes.iter().find(|n| n.id.as_str() == id)
    }

    /// Heading offset of a node
    pub fn offset_for(&self, id: &str) -> Option<f32> {
        self.find_node(id).map(|n| n.offset_deg)
    }

    /// Label marker prefix
    pub fn node_prefix(&self) -> &str {
        self.protocol.node_prefix.as_str()
    }

    /// Add a node, rejecting duplicates and overflow
    pub fn add_node(&mut self, node: NodeConfig) -> Result<(), ConfigError> {
        if self.find_node(&node.id).is_some() {
            return Err(ConfigError::DuplicateNode);
        }
        self.nodes.push(node).map_err(|_| ConfigError::TooManyNodes)
    }

    /// Check cross-field invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nodes.is_empty() {
            return Err(ConfigError::NoNodes);
        }
        if self.display.width.min(self.display.height) < MIN_DISPLAY_SIDE {
            return Err(ConfigError::InvalidDisplaySize);
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if !is_valid_label(&node.id, self.node_prefix()) {
                return Err(ConfigError::InvalidNodeId);
            }
            if !(0.0..360.0).contains(&node.offset_deg) {
                return Err(ConfigError::OffsetOutOfRange);
            }
            if node.baudrate == 0 {
                return Err(ConfigError::InvalidValue);
            }
            for other in &self.nodes[i + 1..] {
                if other.id == node.id {
                    return Err(ConfigError::DuplicateNode);
                }
                if other.uart == node.uart {
                    return Err(ConfigError::UartConflict);
                }
            }
        }
        Ok(())
    }
}
