//! Build script for irrigo-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates irrigation.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

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

    // cortex-m-rt and defmt linker scripts
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// Validate irrigation.toml at compile time
fn validate_config() {
    // Re-run if irrigation.toml changes
    println!("cargo:rerun-if-changed=irrigation.toml");

    let config_path = Path::new("irrigation.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: irrigation.toml not found!                               ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds irrigation.toml as its configuration.       ║\n\
            ║  Please create one in the irrigo-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read irrigation.toml                           ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in irrigation.toml                   ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_thresholds(&config, &mut errors);
    validate_timing(&config, &mut errors);
    validate_buzzer(&config, &mut errors);
    validate_pins(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in irrigation.toml                 ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=irrigation.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

const SECTIONS: &[&str] = &["calibration", "moisture", "climate", "timing", "buzzer", "pins"];

/// Only known sections, each a table
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, value) in root {
        if !SECTIONS.contains(&name.as_str()) {
            errors.push(format!("unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("[{}] must be a table", name));
        }
    }
}

/// Numeric value (integer or float) of `section.key`
fn number(config: &toml::Value, section: &str, key: &str) -> Option<f64> {
    match config.get(section)?.get(key)? {
        toml::Value::Integer(i) => Some(*i as f64),
        toml::Value::Float(f) => Some(*f),
        _ => None,
    }
}

/// Check that `section.key`, if present, is a number within range
fn check_range(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: f64,
    max: f64,
    errors: &mut Vec<String>,
) {
    let Some(raw) = config.get(section).and_then(|s| s.get(key)) else {
        return;
    };

    match number(config, section, key) {
        Some(v) if (min..=max).contains(&v) => {}
        Some(_) => errors.push(format!("{}.{} must be {}-{}", section, key, min, max)),
        None => errors.push(format!("{}.{} must be a number, got {}", section, key, raw.type_str())),
    }
}

fn validate_thresholds(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "calibration", "wet_raw", 0.0, 65535.0, errors);
    check_range(config, "calibration", "dry_raw", 0.0, 65535.0, errors);
    for key in ["low", "off", "critical"] {
        check_range(config, "moisture", key, 0.0, 100.0, errors);
    }
    check_range(config, "climate", "temp_high", -40.0, 80.0, errors);
    check_range(config, "climate", "temp_critical", -40.0, 80.0, errors);
    check_range(config, "climate", "humidity_low", 0.0, 100.0, errors);

    // Defaults used for keys that are not present
    let low = number(config, "moisture", "low").unwrap_or(40.0);
    let off = number(config, "moisture", "off").unwrap_or(55.0);
    if off < low {
        errors.push(format!("moisture.off ({}) must not be below moisture.low ({})", off, low));
    }
    if off == low {
        println!("cargo:warning=moisture.off equals moisture.low; pump control has no hysteresis");
    }

    let wet = number(config, "calibration", "wet_raw").unwrap_or(30000.0);
    let dry = number(config, "calibration", "dry_raw").unwrap_or(56000.0);
    if wet == dry {
        println!("cargo:warning=calibration.wet_raw equals dry_raw; moisture will always read 0 %");
    }
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    check_range(config, "timing", "min_on", 0.0, 3600.0, errors);
    check_range(config, "timing", "sensor_period", 0.001, 3600.0, errors);
    check_range(config, "timing", "display_period", 0.0, 3600.0, errors);
    check_range(config, "timing", "overrun_yield", 0.0, 10.0, errors);
}

fn validate_buzzer(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(v) = config.get("buzzer").and_then(|b| b.get("enabled")) {
        if !v.is_bool() {
            errors.push("buzzer.enabled must be true or false".to_string());
        }
    }

    check_range(config, "buzzer", "frequency_hz", 20.0, 20000.0, errors);
    check_range(config, "buzzer", "critical_repeats", 0.0, 255.0, errors);
    check_range(config, "buzzer", "critical_pause", 0.0, 10.0, errors);
    for pulse in ["critical", "start", "stop", "activity"] {
        check_range(config, "buzzer", &format!("{}_beep", pulse), 0.0, 10.0, errors);
        check_range(config, "buzzer", &format!("{}_duty", pulse), 0.0, 65535.0, errors);
    }
}

/// Pin strings: optional `!`/`^` prefixes, then `gpioN` with N in 0..=29
fn valid_pin(s: &str) -> bool {
    let s = s.trim_start_matches(['!', '^']);
    s.strip_prefix("gpio")
        .and_then(|n| n.parse::<u8>().ok())
        .is_some_and(|n| n <= 29)
}

fn validate_pins(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(pins) = config.get("pins").and_then(|p| p.as_table()) else {
        return;
    };

    let mut used = Vec::new();
    for (name, value) in pins {
        match value.as_str() {
            Some(s) if valid_pin(s) => {
                let n = s.trim_start_matches(['!', '^']).to_string();
                if used.contains(&n) {
                    errors.push(format!("pins.{} reuses {}", name, n));
                }
                used.push(n);
            }
            _ => errors.push(format!("pins.{} must be a pin string like \"gpio13\"", name)),
        }
    }
}
