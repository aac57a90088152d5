//! Build script for azimuth-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates nodes.toml at compile time

use std::collections::HashSet;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// UART peripherals on the RP2040
const UART_COUNT: i64 = 2;

/// Longest node label the line parser accepts
const MAX_NODE_ID_LEN: usize = 8;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate nodes.toml at compile time
///
/// The firmware falls back to a built-in config when nodes.toml is bad,
/// which is easy to miss on a headless board. Failing the build is louder.
fn validate_config() {
    println!("cargo:rerun-if-changed=nodes.toml");

    let config_path = Path::new("nodes.toml");
    if !config_path.exists() {
        fail("nodes.toml not found", &["Create one next to Cargo.toml."]);
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read nodes.toml", &[&e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail("nodes.toml is not valid TOML", &[&e.to_string()]),
    };

    let mut errors = Vec::new();
    let prefix = validate_protocol(&config, &mut errors);
    validate_poll(&config, &mut errors);
    validate_display(&config, &mut errors);
    validate_nodes(&config, &prefix, &mut errors);

    if !errors.is_empty() {
        let lines: Vec<&str> = errors.iter().map(String::as_str).collect();
        fail("Invalid node configuration", &lines);
    }
}

fn validate_protocol(config: &toml::Value, errors: &mut Vec<String>) -> String {
    match config.get("protocol").and_then(|p| p.get("node_prefix")) {
        None => "esp".to_string(),
        Some(toml::Value::String(prefix)) if !prefix.is_empty() && prefix.len() < MAX_NODE_ID_LEN => {
            prefix.clone()
        }
        Some(_) => {
            errors.push(format!(
                "[protocol] node_prefix must be a string of 1-{} bytes",
                MAX_NODE_ID_LEN - 1
            ));
            "esp".to_string()
        }
    }
}

fn validate_poll(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(interval) = config.get("poll").and_then(|p| p.get("interval_ms")) {
        match interval.as_integer() {
            Some(ms) if (1..=10_000).contains(&ms) => {}
            _ => errors.push("[poll] interval_ms must be 1-10000".to_string()),
        }
    }
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = config.get("display") else {
        return;
    };

    for key in ["width", "height"] {
        if let Some(value) = display.get(key) {
            match value.as_integer() {
                Some(px) if (64..=320).contains(&px) => {}
                _ => errors.push(format!("[display] {} must be 64-320", key)),
            }
        }
    }
    for key in ["col_offset", "row_offset"] {
        if let Some(value) = display.get(key) {
            match value.as_integer() {
                Some(px) if (0..=320).contains(&px) => {}
                _ => errors.push(format!("[display] {} must be 0-320", key)),
            }
        }
    }
    for key in ["filled_head", "backlight"] {
        if let Some(value) = display.get(key) {
            if !value.is_bool() {
                errors.push(format!("[display] {} must be true or false", key));
            }
        }
    }
}

fn validate_nodes(config: &toml::Value, prefix: &str, errors: &mut Vec<String>) {
    let nodes = match config.get("node") {
        Some(toml::Value::Table(t)) if !t.is_empty() => t,
        _ => {
            errors.push("at least one [node.<id>] section is required".to_string());
            return;
        }
    };

    if nodes.len() > UART_COUNT as usize {
        errors.push(format!("at most {} nodes (one per UART)", UART_COUNT));
    }

    let mut uarts = HashSet::new();
    for (name, node) in nodes {
        let valid_label = name.len() <= MAX_NODE_ID_LEN
            && name
                .strip_prefix(prefix)
                .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        if !valid_label {
            errors.push(format!(
                "[node.{}] id must be '{}' plus letters/digits, max {} bytes",
                name, prefix, MAX_NODE_ID_LEN
            ));
        }

        let Some(node) = node.as_table() else {
            errors.push(format!("[node.{}] must be a table", name));
            continue;
        };

        let offset = node
            .get("offset_deg")
            .and_then(|v| v.as_float().or_else(|| v.as_integer().map(|i| i as f64)));
        match offset {
            Some(deg) if (0.0..360.0).contains(&deg) => {}
            Some(_) => errors.push(format!("[node.{}] offset_deg must be in [0, 360)", name)),
            None => errors.push(format!("[node.{}] missing numeric 'offset_deg'", name)),
        }

        match node.get("uart").and_then(|v| v.as_integer()) {
            Some(uart) if (0..UART_COUNT).contains(&uart) => {
                if !uarts.insert(uart) {
                    errors.push(format!("[node.{}] UART{} already used by another node", name, uart));
                }
            }
            Some(_) => errors.push(format!("[node.{}] uart must be 0 or 1", name)),
            None => errors.push(format!("[node.{}] missing 'uart'", name)),
        }

        if let Some(baud) = node.get("baudrate") {
            match baud.as_integer() {
                Some(b) if b > 0 && b <= 3_000_000 => {}
                _ => errors.push(format!("[node.{}] baudrate must be 1-3000000", name)),
            }
        }

        for key in node.keys() {
            if !matches!(key.as_str(), "offset_deg" | "uart" | "baudrate") {
                errors.push(format!("[node.{}] unknown key '{}'", name, key));
            }
        }
    }
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[&str]) -> ! {
    let body = lines
        .iter()
        .map(|e| format!("║  • {:<62} ║", e))
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}
