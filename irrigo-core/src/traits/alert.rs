//! Audible alert trait

use crate::alert::AlertPulse;

/// Errors that can occur driving the buzzer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertError {
    /// PWM output could not be configured
    OutputFault,
}

/// Trait for the buzzer
///
/// All calls block for the time they report, which is how the scheduler
/// accounts for them in the cycle budget.
pub trait AlertOutput {
    /// Play one pulse, then silence the output
    ///
    /// Returns the time consumed in milliseconds.
    fn pulse(&mut self, pulse: &AlertPulse) -> Result<u32, AlertError>;

    /// Stay silent for `ms` milliseconds
    ///
    /// Returns the time consumed in milliseconds.
    fn rest(&mut self, ms: u32) -> u32;

    /// Force the output silent
    fn silence(&mut self) -> Result<(), AlertError>;
}
