//! Per-cycle sensor snapshot

use super::moisture::{raw_to_percent_x10, raw_to_percent_x10_ceil};
use crate::config::MoistureCalibration;
use crate::traits::{EnvironmentError, EnvironmentReading, EnvironmentSensor, SoilSensor};

/// One consistent set of readings for a single control cycle
///
/// Created fresh every cycle and never modified. The climate reading is a
/// single `Option`, so temperature and humidity cannot be half present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSnapshot {
    /// Soil moisture (% × 10, 0..=1000)
    pub soil_pct_x10: u16,
    /// Soil moisture rounded up to the next 0.1 % step, for strict "above"
    /// comparisons; equal to `soil_pct_x10` when the reading is on a step
    pub soil_ceil_pct_x10: u16,
    /// Raw sensor value the percentage was derived from
    pub soil_raw: u16,
    /// Climate reading, absent if the sensor failed this cycle
    pub environment: Option<EnvironmentReading>,
    /// Capture time (ms)
    pub captured_at_ms: u64,
}

impl SensorSnapshot {
    /// Build a snapshot from a raw soil value
    pub fn new(
        soil_raw: u16,
        calibration: &MoistureCalibration,
        environment: Option<EnvironmentReading>,
        captured_at_ms: u64,
    ) -> Self {
        Self {
            soil_pct_x10: raw_to_percent_x10(soil_raw, calibration),
            soil_ceil_pct_x10: raw_to_percent_x10_ceil(soil_raw, calibration),
            soil_raw,
            environment,
            captured_at_ms,
        }
    }

    /// Air temperature (°C × 10), if the climate read succeeded
    pub fn temperature_x10(&self) -> Option<i16> {
        self.environment.map(|e| e.temperature_x10)
    }

    /// Relative humidity (%RH × 10), if the climate read succeeded
    pub fn humidity_x10(&self) -> Option<u16> {
        self.environment.map(|e| e.humidity_x10)
    }
}

/// Result of one sensor fusion step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capture {
    /// The snapshot to decide on
    pub snapshot: SensorSnapshot,
    /// Why the climate reading is missing, for logging
    pub environment_error: Option<EnvironmentError>,
}

/// Read both sensors once
///
/// The climate sensor is not retried; a failure leaves the snapshot with
/// soil data only and is reported alongside it.
pub fn capture<S, E>(
    soil: &mut S,
    environment: &mut E,
    calibration: &MoistureCalibration,
    now_ms: u64,
) -> Capture
where
    S: SoilSensor,
    E: EnvironmentSensor,
{
    let soil_raw = soil.read_raw();

    let (reading, environment_error) = match environment.read() {
        Ok(reading) => (Some(reading), None),
        Err(e) => (None, Some(e)),
    };

    Capture {
        snapshot: SensorSnapshot::new(soil_raw, calibration, reading, now_ms),
        environment_error,
    }
}
