//! Boot-time configuration validation
//!
//! Rejects configurations the controller cannot run safely and reports
//! questionable ones as warnings so the firmware can log them.

use heapless::Vec;

use super::types::IrrigationConfig;

/// Maximum number of warnings reported by a single validation
pub const MAX_WARNINGS: usize = 8;

/// Full scale of ×10 percentages
const PERCENT_X10_MAX: u16 = 1000;

/// Configuration rejected at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Stop threshold is below the start threshold
    InvertedHysteresis {
        /// Start threshold (×10)
        low_x10: u16,
        /// Stop threshold (×10)
        off_x10: u16,
    },
    /// A moisture or humidity threshold exceeds 100 %
    PercentOutOfRange,
    /// Sensor period of zero would spin the loop
    ZeroSensorPeriod,
}

/// Configuration accepted with a caveat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigWarning {
    /// Start and stop thresholds are equal; control is not hysteretic
    ZeroHysteresisGap,
    /// Wet and dry calibration are equal; moisture always reads 0 %
    DegenerateCalibration,
    /// Critical moisture is not below the start threshold
    CriticalNotBelowLow,
    /// Critical temperature is not above the climate demand threshold
    CriticalTempNotAboveHigh,
    /// Minimum-on time is zero; only the hysteresis band prevents chatter
    NoMinimumOnTime,
    /// Buzzer patterns alone exceed the sensor period
    AlertsExceedPeriod,
}

impl IrrigationConfig {
    /// Validate the configuration
    ///
    /// Returns the list of warnings on success. Warnings never prevent the
    /// controller from running.
    pub fn validate(&self) -> Result<Vec<ConfigWarning, MAX_WARNINGS>, ConfigError> {
        let th = &self.thresholds;

        if th.moisture_off_x10 < th.moisture_low_x10 {
            return Err(ConfigError::InvertedHysteresis {
                low_x10: th.moisture_low_x10,
                off_x10: th.moisture_off_x10,
            });
        }

        let percents = [
            th.moisture_low_x10,
            th.moisture_off_x10,
            th.moisture_critical_x10,
            th.humidity_low_x10,
        ];
        if percents.iter().any(|&p| p > PERCENT_X10_MAX) {
            return Err(ConfigError::PercentOutOfRange);
        }

        if self.timing.sensor_period_ms == 0 {
            return Err(ConfigError::ZeroSensorPeriod);
        }

        let mut warnings = Vec::new();
        let mut warn = |w: ConfigWarning| {
            // Capacity covers every variant
            let _ = warnings.push(w);
        };

        if th.hysteresis_gap_x10() == 0 {
            warn(ConfigWarning::ZeroHysteresisGap);
        }
        if self.calibration.wet_raw == self.calibration.dry_raw {
            warn(ConfigWarning::DegenerateCalibration);
        }
        if th.moisture_critical_x10 >= th.moisture_low_x10 {
            warn(ConfigWarning::CriticalNotBelowLow);
        }
        if th.temp_critical_x10 <= th.temp_high_x10 {
            warn(ConfigWarning::CriticalTempNotAboveHigh);
        }
        if self.timing.min_on_ms == 0 {
            warn(ConfigWarning::NoMinimumOnTime);
        }
        if self.alerts.enabled && self.worst_case_alert_ms() >= self.timing.sensor_period_ms {
            warn(ConfigWarning::AlertsExceedPeriod);
        }

        Ok(warnings)
    }

    /// Longest time the buzzer can hold a single cycle
    ///
    /// A critical pattern plus the longest pump pulse can both play in the
    /// same cycle.
    pub fn worst_case_alert_ms(&self) -> u32 {
        let a = &self.alerts;
        let pattern = a
            .critical_pulse
            .duration_ms
            .saturating_add(a.critical_pause_ms)
            .saturating_mul(a.critical_repeats as u32);
        let pump = a
            .start_pulse
            .duration_ms
            .max(a.stop_pulse.duration_ms)
            .max(a.activity_pulse.duration_ms);
        pattern.saturating_add(pump)
    }
}
