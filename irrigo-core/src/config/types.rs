//! Configuration type definitions
//!
//! These types represent the controller configuration. It is built once at
//! boot (embedded TOML or defaults) and never changes while the loop runs.

use super::hardware::HardwareConfig;

/// Soil sensor calibration endpoints
///
/// Capacitive sensors read lower when wet, so `wet_raw` is normally below
/// `dry_raw`, but the mapper accepts either ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoistureCalibration {
    /// Raw ADC reading (16-bit scale) in saturated soil, maps to 100 %
    pub wet_raw: u16,
    /// Raw ADC reading (16-bit scale) in dry soil, maps to 0 %
    pub dry_raw: u16,
}

impl Default for MoistureCalibration {
    fn default() -> Self {
        Self {
            wet_raw: 30_000,
            dry_raw: 56_000,
        }
    }
}

/// Decision thresholds
///
/// All values are ×10 fixed point (400 = 40.0 %, 350 = 35.0 °C).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Thresholds {
    /// Soil moisture below this requests irrigation
    pub moisture_low_x10: u16,
    /// Soil moisture above this allows irrigation to stop
    pub moisture_off_x10: u16,
    /// Soil moisture below this raises a critical alert
    pub moisture_critical_x10: u16,
    /// Temperature above this (with low humidity) requests irrigation
    pub temp_high_x10: i16,
    /// Temperature at or above this raises a critical alert
    pub temp_critical_x10: i16,
    /// Humidity below this counts as dry air
    pub humidity_low_x10: u16,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            moisture_low_x10: 400,
            moisture_off_x10: 550,
            moisture_critical_x10: 200,
            temp_high_x10: 350,
            temp_critical_x10: 400,
            humidity_low_x10: 250,
        }
    }
}

impl Thresholds {
    /// Width of the hysteresis band between start and stop thresholds
    pub fn hysteresis_gap_x10(&self) -> i32 {
        self.moisture_off_x10 as i32 - self.moisture_low_x10 as i32
    }
}

/// Loop timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Minimum time the pump stays on before it may be stopped (ms)
    pub min_on_ms: u32,
    /// Target period of one control cycle (ms)
    pub sensor_period_ms: u32,
    /// Minimum time between display refreshes (ms)
    pub display_period_ms: u32,
    /// Idle time after a cycle that overran its period (ms)
    pub overrun_yield_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_on_ms: 10_000,
            sensor_period_ms: 5_000,
            display_period_ms: 2_000,
            overrun_yield_ms: 50,
        }
    }
}

/// Shape of a single buzzer pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseShape {
    /// Tone duration (ms)
    pub duration_ms: u32,
    /// PWM duty on a 16-bit scale (loudness)
    pub duty: u16,
}

impl PulseShape {
    /// Create a pulse shape
    pub const fn new(duration_ms: u32, duty: u16) -> Self {
        Self { duration_ms, duty }
    }
}

/// Buzzer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlertConfig {
    /// Master enable; when false no pulse is ever emitted
    pub enabled: bool,
    /// Default PWM carrier frequency (Hz)
    pub frequency_hz: u32,
    /// One pulse of the critical pattern
    pub critical_pulse: PulseShape,
    /// Number of pulses in the critical pattern
    pub critical_repeats: u8,
    /// Silence after each critical pulse (ms)
    pub critical_pause_ms: u32,
    /// Confirmation pulse when the pump starts
    pub start_pulse: PulseShape,
    /// Confirmation pulse when the pump stops
    pub stop_pulse: PulseShape,
    /// Activity pulse emitted every cycle the pump keeps running
    pub activity_pulse: PulseShape,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency_hz: 2_000,
            critical_pulse: PulseShape::new(120, 40_000),
            critical_repeats: 4,
            critical_pause_ms: 200,
            start_pulse: PulseShape::new(50, 30_000),
            stop_pulse: PulseShape::new(80, 30_000),
            activity_pulse: PulseShape::new(40, 15_000),
        }
    }
}

/// Complete controller configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrrigationConfig {
    /// Soil sensor calibration
    pub calibration: MoistureCalibration,
    /// Decision thresholds
    pub thresholds: Thresholds,
    /// Loop timing
    pub timing: TimingConfig,
    /// Buzzer behavior
    pub alerts: AlertConfig,
    /// Pin assignments
    pub hardware: HardwareConfig,
}
