//! Pump actuator trait

/// Errors that can occur driving the pump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// Output did not take the commanded level
    OutputFault,
    /// Actuator not available
    NotReady,
}

/// Trait for pump output control
///
/// Implementations own any polarity translation (active-low relay
/// modules), so callers only ever speak in logical ON/OFF.
pub trait PumpActuator {
    /// Turn the pump on or off
    ///
    /// Must be idempotent: commanding the current state again is harmless.
    fn set_on(&mut self, on: bool) -> Result<(), ActuatorError>;

    /// Check if the pump is currently commanded on
    fn is_on(&self) -> bool;
}
