//! Build script for stratum-panel
//!
//! Validates the embedded panel.toml at compile time so a broken default
//! configuration never reaches the binary.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=panel.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("panel.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => panic!("\n  ERROR: cannot read panel.toml: {}\n", e),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => panic!("\n  ERROR: invalid TOML in panel.toml\n\n{}\n", e),
    };

    let mut errors = Vec::new();
    for section in ["serial", "pins", "media", "projector", "timing", "exposure"] {
        if config.get(section).is_none() {
            errors.push(format!("missing [{}] section", section));
        }
    }
    validate_pins(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n  ERROR: panel.toml failed validation\n{}\n",
            errors
                .iter()
                .map(|e| format!("    - {}", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

/// Every button needs its own BCM line on the header
fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(toml::Value::Table(pins)) = config.get("pins") else {
        return;
    };
    let mut seen = HashSet::new();
    for name in ["start", "stop", "jog_up", "jog_down"] {
        match pins.get(name) {
            Some(toml::Value::Integer(pin)) if (0..28).contains(pin) => {
                if !seen.insert(*pin) {
                    errors.push(format!("[pins] {} reuses GPIO {}", name, pin));
                }
            }
            Some(_) => errors.push(format!("[pins] {} must be a BCM number 0-27", name)),
            None => errors.push(format!("[pins] missing '{}'", name)),
        }
    }
}
