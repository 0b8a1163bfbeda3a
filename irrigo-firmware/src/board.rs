//! Board pin map
//!
//! The firmware takes typed embassy peripherals, so the GPIOs it drives are
//! fixed at compile time. The `[pins]` section of irrigation.toml documents
//! the wiring; at boot it is compared against this map and any difference
//! is logged. Only polarity and pull settings are taken from the config.

use irrigo_core::config::{HardwareConfig, PinConfig};

/// Pins wired in `main` (Pico W reference build)
pub const BOARD_PINS: HardwareConfig = HardwareConfig {
    soil_adc_pin: PinConfig::new(27),
    dht_pin: PinConfig::new(2),
    relay_pin: PinConfig::inverted(13),
    buzzer_pin: PinConfig::new(18),
    i2c_sda_pin: PinConfig::new(0),
    i2c_scl_pin: PinConfig::new(1),
    stop_pin: PinConfig::button(15),
};

/// A configured pin that differs from the board wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinMismatch {
    /// Function name as written in `[pins]`
    pub name: &'static str,
    /// GPIO in the config
    pub configured: u8,
    /// GPIO the firmware actually drives
    pub wired: u8,
}

/// Compare configured GPIO numbers against the board map
pub fn wiring_mismatches(hw: &HardwareConfig) -> impl Iterator<Item = PinMismatch> {
    let pairs = [
        ("soil_adc", hw.soil_adc_pin, BOARD_PINS.soil_adc_pin),
        ("dht", hw.dht_pin, BOARD_PINS.dht_pin),
        ("relay", hw.relay_pin, BOARD_PINS.relay_pin),
        ("buzzer", hw.buzzer_pin, BOARD_PINS.buzzer_pin),
        ("i2c_sda", hw.i2c_sda_pin, BOARD_PINS.i2c_sda_pin),
        ("i2c_scl", hw.i2c_scl_pin, BOARD_PINS.i2c_scl_pin),
        ("stop_button", hw.stop_pin, BOARD_PINS.stop_pin),
    ];

    pairs
        .into_iter()
        .filter(|(_, configured, wired)| configured.pin != wired.pin)
        .map(|(name, configured, wired)| PinMismatch {
            name,
            configured: configured.pin,
            wired: wired.pin,
        })
}
