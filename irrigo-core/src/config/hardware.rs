//! Hardware configuration types
//!
//! Pin assignments for the peripherals the controller drives.

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
    /// Enable internal pull-up
    pub pull_up: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
            pull_up: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: false,
        }
    }

    /// Create an inverted input with pull-up (button to ground)
    pub const fn button(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
            pull_up: true,
        }
    }
}

/// Peripheral pin map
///
/// Defaults match the reference Pico W build: OLED on I2C0 (GP0/GP1),
/// soil sensor on ADC1 (GP27), DHT22 on GP2, active-low relay module on
/// GP13, passive buzzer on GP18 and a stop button on GP15.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HardwareConfig {
    /// Soil sensor analog input
    pub soil_adc_pin: PinConfig,
    /// DHT22 data line
    pub dht_pin: PinConfig,
    /// Pump relay output (inverted for active-low modules)
    pub relay_pin: PinConfig,
    /// Passive buzzer PWM output
    pub buzzer_pin: PinConfig,
    /// Display I2C data
    pub i2c_sda_pin: PinConfig,
    /// Display I2C clock
    pub i2c_scl_pin: PinConfig,
    /// Stop button input
    pub stop_pin: PinConfig,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            soil_adc_pin: PinConfig::new(27),
            dht_pin: PinConfig::new(2),
            relay_pin: PinConfig::inverted(13),
            buzzer_pin: PinConfig::new(18),
            i2c_sda_pin: PinConfig::new(0),
            i2c_scl_pin: PinConfig::new(1),
            stop_pin: PinConfig::button(15),
        }
    }
}
