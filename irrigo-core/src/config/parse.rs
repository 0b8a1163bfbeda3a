//! Minimal TOML parser for the irrigation configuration
//!
//! Handles only the subset the controller needs and runs without an
//! allocator, so the firmware can parse its embedded `irrigation.toml` at
//! boot. The build script validates the same file with the full `toml`
//! crate.
//!
//! Supported features:
//! - `[section]` headers
//! - `key = value` pairs (string, integer, decimal, boolean)
//! - Comments (`# ...`), including trailing comments
//!
//! NOT supported:
//! - Dotted or nested sections
//! - Arrays and inline tables
//! - Multi-line strings
//!
//! Percentages and temperatures may be written with one decimal place
//! (`35.5`); durations are written in seconds with up to three decimal
//! places (`0.05`). Unknown keys are ignored; unknown sections are errors.

use super::hardware::PinConfig;
use super::types::{IrrigationConfig, PulseShape};

/// What went wrong on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseErrorKind {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Invalid pin string
    InvalidPin,
    /// Line is neither a header, a comment nor `key = value`
    Malformed,
}

/// Parse error with the 1-based line it occurred on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseError {
    /// Line number (1-based)
    pub line: usize,
    /// Error kind
    pub kind: ParseErrorKind,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Calibration,
    Moisture,
    Climate,
    Timing,
    Buzzer,
    Pins,
}

/// Parse TOML configuration into an [`IrrigationConfig`]
///
/// Keys that are not present keep their default values.
pub fn parse_config(input: &str) -> Result<IrrigationConfig, ParseError> {
    let mut config = IrrigationConfig::default();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let at = |kind| ParseError {
            line: index + 1,
            kind,
        };
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err(at(ParseErrorKind::InvalidSection));
            }
            section =
                parse_section_header(&line[1..line.len() - 1]).map_err(at)?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(at(ParseErrorKind::Malformed))?;
        apply_value(section, key, value, &mut config).map_err(at)?;
    }

    Ok(config)
}

/// Parse a section header name
fn parse_section_header(header: &str) -> Result<Section, ParseErrorKind> {
    match header.trim() {
        "calibration" => Ok(Section::Calibration),
        "moisture" => Ok(Section::Moisture),
        "climate" => Ok(Section::Climate),
        "timing" => Ok(Section::Timing),
        "buzzer" => Ok(Section::Buzzer),
        "pins" => Ok(Section::Pins),
        _ => Err(ParseErrorKind::InvalidSection),
    }
}

/// Remove a trailing comment, ignoring `#` inside quoted strings
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut IrrigationConfig,
) -> Result<(), ParseErrorKind> {
    match section {
        Section::Root => {} // No root keys yet
        Section::Calibration => {
            let c = &mut config.calibration;
            match key {
                "wet_raw" => c.wet_raw = parse_int(value)?,
                "dry_raw" => c.dry_raw = parse_int(value)?,
                _ => {}
            }
        }
        Section::Moisture => {
            let t = &mut config.thresholds;
            match key {
                "low" => t.moisture_low_x10 = parse_x10(value)?,
                "off" => t.moisture_off_x10 = parse_x10(value)?,
                "critical" => t.moisture_critical_x10 = parse_x10(value)?,
                _ => {}
            }
        }
        Section::Climate => {
            let t = &mut config.thresholds;
            match key {
                "temp_high" => t.temp_high_x10 = parse_x10(value)?,
                "temp_critical" => t.temp_critical_x10 = parse_x10(value)?,
                "humidity_low" => t.humidity_low_x10 = parse_x10(value)?,
                _ => {}
            }
        }
        Section::Timing => {
            let t = &mut config.timing;
            match key {
                "min_on" => t.min_on_ms = parse_seconds(value)?,
                "sensor_period" => t.sensor_period_ms = parse_seconds(value)?,
                "display_period" => t.display_period_ms = parse_seconds(value)?,
                "overrun_yield" => t.overrun_yield_ms = parse_seconds(value)?,
                _ => {}
            }
        }
        Section::Buzzer => {
            let a = &mut config.alerts;
            match key {
                "enabled" => a.enabled = parse_bool(value)?,
                "frequency_hz" => a.frequency_hz = parse_int(value)?,
                "critical_repeats" => a.critical_repeats = parse_int(value)?,
                "critical_pause" => a.critical_pause_ms = parse_seconds(value)?,
                "critical_beep" => set_duration(&mut a.critical_pulse, value)?,
                "critical_duty" => a.critical_pulse.duty = parse_int(value)?,
                "start_beep" => set_duration(&mut a.start_pulse, value)?,
                "start_duty" => a.start_pulse.duty = parse_int(value)?,
                "stop_beep" => set_duration(&mut a.stop_pulse, value)?,
                "stop_duty" => a.stop_pulse.duty = parse_int(value)?,
                "activity_beep" => set_duration(&mut a.activity_pulse, value)?,
                "activity_duty" => a.activity_pulse.duty = parse_int(value)?,
                _ => {}
            }
        }
        Section::Pins => {
            let h = &mut config.hardware;
            match key {
                "soil_adc" => h.soil_adc_pin = parse_pin(value)?,
                "dht" => h.dht_pin = parse_pin(value)?,
                "relay" => h.relay_pin = parse_pin(value)?,
                "buzzer" => h.buzzer_pin = parse_pin(value)?,
                "i2c_sda" => h.i2c_sda_pin = parse_pin(value)?,
                "i2c_scl" => h.i2c_scl_pin = parse_pin(value)?,
                "stop_button" => h.stop_pin = parse_pin(value)?,
                _ => {}
            }
        }
    }

    Ok(())
}

fn set_duration(pulse: &mut PulseShape, value: &str) -> Result<(), ParseErrorKind> {
    pulse.duration_ms = parse_seconds(value)?;
    Ok(())
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value, accepting TOML digit separators (`30_000`)
fn parse_int<T: TryFrom<i64>>(value: &str) -> Result<T, ParseErrorKind> {
    let n = parse_fixed(value, 0)?;
    T::try_from(n).map_err(|_| ParseErrorKind::InvalidValue)
}

/// Parse a one-decimal quantity into ×10 fixed point (`35.5` → 355)
fn parse_x10<T: TryFrom<i64>>(value: &str) -> Result<T, ParseErrorKind> {
    let n = parse_fixed(value, 1)?;
    T::try_from(n).map_err(|_| ParseErrorKind::InvalidValue)
}

/// Parse a duration in seconds into milliseconds (`0.05` → 50)
fn parse_seconds(value: &str) -> Result<u32, ParseErrorKind> {
    let n = parse_fixed(value, 3)?;
    u32::try_from(n).map_err(|_| ParseErrorKind::InvalidValue)
}

/// Parse a decimal number into fixed point with `decimals` fractional digits
///
/// Extra fractional digits are truncated.
fn parse_fixed(value: &str, decimals: u32) -> Result<i64, ParseErrorKind> {
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ParseErrorKind::InvalidValue);
    }

    let push = |acc: i64, c: char| -> Result<i64, ParseErrorKind> {
        let d = c.to_digit(10).ok_or(ParseErrorKind::InvalidValue)?;
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(d as i64))
            .ok_or(ParseErrorKind::InvalidValue)
    };

    let mut result = 0i64;
    for c in int_part.chars().filter(|&c| c != '_') {
        result = push(result, c)?;
    }

    let mut frac = frac_part.chars();
    for _ in 0..decimals {
        result = push(result, frac.next().unwrap_or('0'))?;
    }
    if frac.any(|c| !c.is_ascii_digit()) {
        return Err(ParseErrorKind::InvalidValue);
    }

    Ok(if negative { -result } else { result })
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseErrorKind> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseErrorKind::InvalidValue),
    }
}

/// Parse a pin string like "gpio13", "!gpio13" (active-low), "^gpio15" (pull-up)
fn parse_pin(value: &str) -> Result<PinConfig, ParseErrorKind> {
    let mut s = parse_string(value).trim();
    let mut pin = PinConfig::default();

    loop {
        if let Some(rest) = s.strip_prefix('!') {
            pin.inverted = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('^') {
            pin.pull_up = true;
            s = rest;
        } else {
            break;
        }
    }

    let number = s.strip_prefix("gpio").ok_or(ParseErrorKind::InvalidPin)?;
    pin.pin = number.parse().map_err(|_| ParseErrorKind::InvalidPin)?;
    if pin.pin > 29 {
        return Err(ParseErrorKind::InvalidPin);
    }

    Ok(pin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fixed() {
        assert_eq!(parse_fixed("35", 1), Ok(350));
        assert_eq!(parse_fixed("35.5", 1), Ok(355));
        assert_eq!(parse_fixed("-3.2", 1), Ok(-32));
        assert_eq!(parse_fixed("0.05", 3), Ok(50));
        assert_eq!(parse_fixed(".2", 3), Ok(200));
        assert_eq!(parse_fixed("30_000", 0), Ok(30_000));
        assert_eq!(parse_fixed("1.25", 1), Ok(12)); // truncated
        assert_eq!(parse_fixed("abc", 0), Err(ParseErrorKind::InvalidValue));
        assert_eq!(parse_fixed("-", 0), Err(ParseErrorKind::InvalidValue));
        assert_eq!(parse_fixed("1.2x", 1), Err(ParseErrorKind::InvalidValue));
    }

    #[test]
    fn test_parse_pin() {
        let pin = parse_pin("gpio27").unwrap();
        assert_eq!(pin.pin, 27);
        assert!(!pin.inverted);
        assert!(!pin.pull_up);

        let pin = parse_pin("\"!gpio13\"").unwrap();
        assert_eq!(pin.pin, 13);
        assert!(pin.inverted);

        let pin = parse_pin("\"^!gpio15\"").unwrap();
        assert_eq!(pin.pin, 15);
        assert!(pin.inverted);
        assert!(pin.pull_up);

        assert_eq!(parse_pin("gpio30"), Err(ParseErrorKind::InvalidPin));
        assert_eq!(parse_pin("pa3"), Err(ParseErrorKind::InvalidPin));
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("low = 40 # percent"), "low = 40 ");
        assert_eq!(strip_comment("relay = \"#13\""), "relay = \"#13\"");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config_str = r#"
# Greenhouse bed 2
[moisture]
low = 35
off = 50.5

[climate]
temp_high = 32.5

[timing]
min_on = 30
sensor_period = 2.5

[buzzer]
enabled = false

[pins]
relay = "gpio14"
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.thresholds.moisture_low_x10, 350);
        assert_eq!(config.thresholds.moisture_off_x10, 505);
        assert_eq!(config.thresholds.moisture_critical_x10, 200); // default kept
        assert_eq!(config.thresholds.temp_high_x10, 325);
        assert_eq!(config.timing.min_on_ms, 30_000);
        assert_eq!(config.timing.sensor_period_ms, 2_500);
        assert!(!config.alerts.enabled);
        assert_eq!(config.hardware.relay_pin.pin, 14);
        assert!(!config.hardware.relay_pin.inverted);
    }

    #[test]
    fn test_error_reports_line() {
        let config_str = "[moisture]\nlow = 40\noff = soggy\n";
        let err = parse_config(config_str).unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.kind, ParseErrorKind::InvalidValue);

        let err = parse_config("[zones]\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert_eq!(err.kind, ParseErrorKind::InvalidSection);

        let err = parse_config("[timing]\nmin_on 10\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Malformed);
    }

    #[test]
    fn test_out_of_range_value() {
        let err = parse_config("[calibration]\nwet_raw = 70000\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidValue);

        let err = parse_config("[moisture]\nlow = -5\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidValue);
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let shipped = include_str!("../../../irrigo-firmware/irrigation.toml");
        let config = parse_config(shipped).unwrap();
        assert_eq!(config, IrrigationConfig::default());
        assert!(config.validate().unwrap().is_empty());
    }
}
