//! Simple TOML parser for node configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! `nodes.toml`. It does NOT support the full TOML spec, and it does not
//! allocate.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float, boolean)
//! - [section] headers
//! - [node.<id>] headers
//! - Comments (# ...), including trailing comments
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Escape sequences in strings

use heapless::String;

use super::types::{
    ConfigError, NodeConfig, NodeId, SystemConfig, DEFAULT_BAUDRATE,
};

/// Current parsing context
#[derive(Debug, Clone)]
enum Section {
    Root,
    Protocol,
    Poll,
    Display,
    Node(NodeId),
}

/// Node section being built
#[derive(Debug, Clone)]
struct NodeBuilder {
    id: NodeId,
    offset_deg: Option<f32>,
    uart: Option<u8>,
    baudrate: u32,
}

impl NodeBuilder {
    fn new(id: NodeId) -> Self {
        Self {
            id,
            offset_deg: None,
            uart: None,
            baudrate: DEFAULT_BAUDRATE,
        }
    }

    fn finish(self) -> Result<NodeConfig, ConfigError> {
        Ok(NodeConfig {
            id: self.id,
            offset_deg: self.offset_deg.ok_or(ConfigError::MissingKey)?,
            uart: self.uart.ok_or(ConfigError::MissingKey)?,
            baudrate: self.baudrate,
        })
    }
}

/// Parsed right-hand side of `key = value`
#[derive(Debug, Clone, Copy, PartialEq)]
enum Value<'a> {
    Str(&'a str),
    Int(i64),
    Float(f32),
    Bool(bool),
}

impl<'a> Value<'a> {
    fn as_str(self) -> Result<&'a str, ConfigError> {
        match self {
            Value::Str(s) => Ok(s),
            _ => Err(ConfigError::InvalidValue),
        }
    }

    fn as_f32(self) -> Result<f32, ConfigError> {
        match self {
            Value::Int(i) => Ok(i as f32),
            Value::Float(f) => Ok(f),
            _ => Err(ConfigError::InvalidValue),
        }
    }

    fn as_bool(self) -> Result<bool, ConfigError> {
        match self {
            Value::Bool(b) => Ok(b),
            _ => Err(ConfigError::InvalidValue),
        }
    }

    fn as_int<T: TryFrom<i64>>(self) -> Result<T, ConfigError> {
        match self {
            Value::Int(i) => T::try_from(i).map_err(|_| ConfigError::InvalidValue),
            _ => Err(ConfigError::InvalidValue),
        }
    }
}

/// Parse TOML configuration into a validated [`SystemConfig`]
pub fn parse_config(input: &str) -> Result<SystemConfig, ConfigError> {
    let mut config = SystemConfig::new();
    let mut section = Section::Root;
    let mut current_node: Option<NodeBuilder> = None;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') {
            // Save previous section
            if let Some(node) = current_node.take() {
                config.add_node(node.finish()?)?;
            }

            section = parse_section_header(&line[1..line.len() - 1])?;
            if let Section::Node(id) = &section {
                current_node = Some(NodeBuilder::new(id.clone()));
            }
            continue;
        }

        let (key, value) = parse_key_value(line)?;
        apply_value(&section, key, value, &mut config, &mut current_node)?;
    }

    // Save final section
    if let Some(node) = current_node.take() {
        config.add_node(node.finish()?)?;
    }

    config.validate()?;
    Ok(config)
}

/// Drop a trailing `# comment`, ignoring `#` inside quoted strings
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse section header like "display" or "node.esp1"
fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    let header = header.trim();

    if let Some(id) = header.strip_prefix("node.") {
        let id = id.trim().trim_matches('"');
        let mut label = NodeId::new();
        label.push_str(id).map_err(|_| ConfigError::InvalidNodeId)?;
        if label.is_empty() {
            return Err(ConfigError::InvalidNodeId);
        }
        return Ok(Section::Node(label));
    }

    match header {
        "protocol" => Ok(Section::Protocol),
        "poll" => Ok(Section::Poll),
        "display" => Ok(Section::Display),
        _ => Err(ConfigError::InvalidSection),
    }
}

/// Parse "key = value"
fn parse_key_value(line: &str) -> Result<(&str, Value<'_>), ConfigError> {
    let (key, raw) = line.split_once('=').ok_or(ConfigError::InvalidValue)?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ConfigError::UnknownKey);
    }
    Ok((key, parse_value(raw.trim())?))
}

fn parse_value(raw: &str) -> Result<Value<'_>, ConfigError> {
    if let Some(inner) = raw.strip_prefix('"') {
        return inner
            .strip_suffix('"')
            .map(Value::Str)
            .ok_or(ConfigError::InvalidValue);
    }
    match raw {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }

    // TOML allows underscores as digit separators
    let mut digits: String<32> = String::new();
    for ch in raw.chars().filter(|&c| c != '_') {
        digits.push(ch).map_err(|_| ConfigError::InvalidValue)?;
    }
    if let Ok(i) = digits.parse::<i64>() {
        return Ok(Value::Int(i));
    }
    match digits.parse::<f32>() {
        Ok(f) if f.is_finite() => Ok(Value::Float(f)),
        _ => Err(ConfigError::InvalidValue),
    }
}

/// Apply a key-value pair to the current section
fn apply_value(
    section: &Section,
    key: &str,
    value: Value<'_>,
    config: &mut SystemConfig,
    current_node: &mut Option<NodeBuilder>,
) -> Result<(), ConfigError> {
    match section {
        Section::Root => Err(ConfigError::UnknownKey),
        Section::Protocol => match key {
            "node_prefix" => {
                let prefix = value.as_str()?;
                config.protocol.node_prefix.clear();
                config
                    .protocol
                    .node_prefix
                    .push_str(prefix)
                    .map_err(|_| ConfigError::InvalidValue)
            }
            _ => Err(ConfigError::UnknownKey),
        },
        Section::Poll => match key {
            "interval_ms" => {
                config.poll.interval_ms = value.as_int()?;
                Ok(())
            }
            _ => Err(ConfigError::UnknownKey),
        },
        Section::Display => {
            let display = &mut config.display;
            match key {
                "width" => display.width = value.as_int()?,
                "height" => display.height = value.as_int()?,
                "col_offset" => display.col_offset = value.as_int()?,
                "row_offset" => display.row_offset = value.as_int()?,
                "filled_head" => display.filled_head = value.as_bool()?,
                "backlight" => display.backlight = value.as_bool()?,
                _ => return Err(ConfigError::UnknownKey),
            }
            Ok(())
        }
        Section::Node(_) => {
            let node = current_node.as_mut().ok_or(ConfigError::InvalidSection)?;
            match key {
                "offset_deg" => node.offset_deg = Some(value.as_f32()?),
                "uart" => node.uart = Some(value.as_int()?),
                "baudrate" => node.baudrate = value.as_int()?,
                _ => return Err(ConfigError::UnknownKey),
            }
            Ok(())
        }
    }
}
