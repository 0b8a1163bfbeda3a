//! Critical condition evaluation

use crate::config::Thresholds;
use crate::sensor::SensorSnapshot;

/// What made a snapshot critical
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CriticalCause {
    /// Soil moisture below the critical threshold
    LowMoisture,
    /// Air temperature at or above the critical threshold
    HighTemperature,
    /// Both at once
    Both,
}

/// Check a snapshot for danger conditions
///
/// A missing climate reading never triggers the temperature branch.
pub fn evaluate_critical(thresholds: &Thresholds, snapshot: &SensorSnapshot) -> Option<CriticalCause> {
    let dry = snapshot.soil_pct_x10 < thresholds.moisture_critical_x10;
    let hot = snapshot
        .temperature_x10()
        .is_some_and(|t| t >= thresholds.temp_critical_x10);

    match (dry, hot) {
        (true, true) => Some(CriticalCause::Both),
        (true, false) => Some(CriticalCause::LowMoisture),
        (false, true) => Some(CriticalCause::HighTemperature),
        (false, false) => None,
    }
}
