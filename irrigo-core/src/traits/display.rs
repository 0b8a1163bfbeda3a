//! Status display trait

use crate::sensor::SensorSnapshot;

/// Errors that can occur updating the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transfer to the panel failed
    Communication,
    /// Display not initialized
    NotInitialized,
}

/// Best-effort status screen
pub trait StatusDisplay {
    /// Show the latest readings and pump state
    ///
    /// Returns the time consumed in milliseconds. Failures are reported but
    /// never stop the control loop.
    fn render(&mut self, snapshot: &SensorSnapshot, pump_on: bool) -> Result<u32, DisplayError>;
}
