//! Pump decision state machine
//!
//! Two states, `Off` and `On`. Starting is immediate whenever irrigation is
//! needed. Stopping needs the soil to climb above a separate, higher
//! threshold *and* the pump to have run for the minimum-on time; together
//! these keep sensor noise around one threshold from chattering the relay.

use crate::config::{IrrigationConfig, Thresholds};
use crate::sensor::SensorSnapshot;

/// Pump states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PumpState {
    /// Pump stopped
    Off,
    /// Pump running
    On,
}

/// Why a running pump keeps running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunReason {
    /// Soil or climate still demands water
    Demand,
    /// Safe to stop, but the minimum-on time has not elapsed
    MinOnPending {
        /// Time left before a stop is allowed (ms)
        remaining_ms: u64,
    },
}

/// Decision for one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PumpAction {
    /// Off → On
    Start,
    /// On → Off
    Stop,
    /// Stay on
    KeepRunning(RunReason),
    /// Stay off
    StayOff,
}

impl PumpAction {
    /// Check if this action changes the pump state
    pub fn is_transition(&self) -> bool {
        matches!(self, PumpAction::Start | PumpAction::Stop)
    }

    /// Output level the actuator must be commanded to, for transitions
    pub fn commanded_level(&self) -> Option<bool> {
        match self {
            PumpAction::Start => Some(true),
            PumpAction::Stop => Some(false),
            _ => None,
        }
    }
}

/// Hot, dry air demands water regardless of soil moisture
///
/// Needs both temperature and humidity; without a climate reading this is
/// never true, so control falls back to soil alone.
pub fn environment_demands_water(thresholds: &Thresholds, snapshot: &SensorSnapshot) -> bool {
    match snapshot.environment {
        Some(env) => {
            env.temperature_x10 > thresholds.temp_high_x10
                && env.humidity_x10 < thresholds.humidity_low_x10
        }
        None => false,
    }
}

/// Irrigation should start
pub fn needs_irrigation(thresholds: &Thresholds, snapshot: &SensorSnapshot) -> bool {
    snapshot.soil_pct_x10 < thresholds.moisture_low_x10
        || environment_demands_water(thresholds, snapshot)
}

/// Irrigation may stop (ignoring the minimum-on time)
///
/// Compares the rounded-up moisture so a reading just past the stop
/// threshold is not lost to truncation.
pub fn safe_to_stop(thresholds: &Thresholds, snapshot: &SensorSnapshot) -> bool {
    snapshot.soil_ceil_pct_x10 > thresholds.moisture_off_x10
        && !environment_demands_water(thresholds, snapshot)
}

/// Pump controller
///
/// Owns the pump state for the lifetime of the process. [`decide`] is pure;
/// [`commit`] is the only way the state changes.
///
/// [`decide`]: PumpController::decide
/// [`commit`]: PumpController::commit
#[derive(Debug, Clone)]
pub struct PumpController {
    thresholds: Thresholds,
    min_on_ms: u32,
    state: PumpState,
    /// Time of the last committed transition, `None` before the first
    last_change_ms: Option<u64>,
}

impl PumpController {
    /// Create a controller with the pump off
    pub fn new(thresholds: Thresholds, min_on_ms: u32) -> Self {
        Self {
            thresholds,
            min_on_ms,
            state: PumpState::Off,
            last_change_ms: None,
        }
    }

    /// Create a controller from the full configuration
    pub fn from_config(config: &IrrigationConfig) -> Self {
        Self::new(config.thresholds, config.timing.min_on_ms)
    }

    /// Current state
    pub fn state(&self) -> PumpState {
        self.state
    }

    /// Check if the pump is on
    pub fn is_on(&self) -> bool {
        self.state == PumpState::On
    }

    /// Time of the last committed transition
    pub fn last_change_ms(&self) -> Option<u64> {
        self.last_change_ms
    }

    /// Time since the last committed transition
    pub fn time_in_state_ms(&self, now_ms: u64) -> Option<u64> {
        self.last_change_ms.map(|t| now_ms.saturating_sub(t))
    }

    /// Decide what the pump should do this cycle
    ///
    /// Conditions are re-evaluated from scratch each call; nothing about a
    /// blocked stop is remembered.
    pub fn decide(&self, snapshot: &SensorSnapshot, now_ms: u64) -> PumpAction {
        match self.state {
            PumpState::Off => {
                if needs_irrigation(&self.thresholds, snapshot) {
                    PumpAction::Start
                } else {
                    PumpAction::StayOff
                }
            }
            PumpState::On => {
                if !safe_to_stop(&self.thresholds, snapshot) {
                    return PumpAction::KeepRunning(RunReason::Demand);
                }

                // On without a recorded start only happens if state was
                // forced; treat the minimum as served
                let elapsed = self.time_in_state_ms(now_ms).unwrap_or(u64::MAX);
                let min_on = self.min_on_ms as u64;

                if elapsed >= min_on {
                    PumpAction::Stop
                } else {
                    PumpAction::KeepRunning(RunReason::MinOnPending {
                        remaining_ms: min_on - elapsed,
                    })
                }
            }
        }
    }

    /// Commit a decision after the actuator accepted it
    ///
    /// Returns true if the state changed. Actions that do not match the
    /// current state (stale decisions) are ignored.
    pub fn commit(&mut self, action: PumpAction, now_ms: u64) -> bool {
        let next = match (self.state, action) {
            (PumpState::Off, PumpAction::Start) => PumpState::On,
            (PumpState::On, PumpAction::Stop) => PumpState::Off,
            _ => return false,
        };

        self.state = next;
        self.last_change_ms = Some(now_ms);
        true
    }

    /// Force the pump state off during shutdown, bypassing minimum-on
    pub fn force_off(&mut self, now_ms: u64) {
        if self.state == PumpState::On {
            self.state = PumpState::Off;
            self.last_change_ms = Some(now_ms);
        }
    }
}
