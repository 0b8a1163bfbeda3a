//! Buzzer pulses and patterns

use crate::config::{AlertConfig, PulseShape};
use crate::control::PumpAction;
use crate::traits::{AlertError, AlertOutput};

/// A single tone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlertPulse {
    /// Tone duration (ms)
    pub duration_ms: u32,
    /// PWM duty on a 16-bit scale
    pub duty: u16,
    /// Carrier frequency override, `None` keeps the driver default
    pub frequency_hz: Option<u32>,
}

impl AlertPulse {
    /// Pulse at the default frequency
    pub const fn new(duration_ms: u32, duty: u16) -> Self {
        Self {
            duration_ms,
            duty,
            frequency_hz: None,
        }
    }

    /// Same pulse at a different carrier frequency
    pub const fn with_frequency(self, hz: u32) -> Self {
        Self {
            frequency_hz: Some(hz),
            ..self
        }
    }
}

impl From<PulseShape> for AlertPulse {
    fn from(shape: PulseShape) -> Self {
        Self::new(shape.duration_ms, shape.duty)
    }
}

/// A pattern cut short by a failed pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PatternFault {
    /// Error from the failed pulse
    pub error: AlertError,
    /// Time already consumed by the completed repetitions (ms)
    pub spent_ms: u32,
}

/// A pulse repeated with a pause after each repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlertPattern {
    /// Pulse played on every repetition
    pub pulse: AlertPulse,
    /// Number of repetitions
    pub repeats: u8,
    /// Silence after each pulse (ms)
    pub pause_ms: u32,
}

impl AlertPattern {
    /// Critical warning pattern from configuration
    pub fn critical(config: &AlertConfig) -> Self {
        Self {
            pulse: config.critical_pulse.into(),
            repeats: config.critical_repeats,
            pause_ms: config.critical_pause_ms,
        }
    }

    /// Nominal duration of the whole pattern (ms)
    pub fn duration_ms(&self) -> u32 {
        self.pulse.duration_ms.saturating_add(self.pause_ms).saturating_mul(self.repeats as u32)
    }

    /// Play the pattern, blocking
    ///
    /// Stops at the first failed pulse. Returns the time consumed, which
    /// the fault also carries when the pattern is cut short.
    pub fn play<A: AlertOutput + ?Sized>(&self, output: &mut A) -> Result<u32, PatternFault> {
        let mut spent = 0u32;
        for _ in 0..self.repeats {
            let pulse_ms = output.pulse(&self.pulse).map_err(|error| PatternFault {
                error,
                spent_ms: spent,
            })?;
            spent = spent.saturating_add(pulse_ms);
            spent = spent.saturating_add(output.rest(self.pause_ms));
        }
        Ok(spent)
    }
}

/// Confirmation or activity pulse for a pump decision
///
/// Start and stop get their confirmation pulse; a pump that keeps running
/// gets the short activity pulse; an idle pump stays quiet.
pub fn pump_pulse(config: &AlertConfig, action: PumpAction) -> Option<AlertPulse> {
    let shape = match action {
        PumpAction::Start => config.start_pulse,
        PumpAction::Stop => config.stop_pulse,
        PumpAction::KeepRunning(_) => config.activity_pulse,
        PumpAction::StayOff => return None,
    };
    Some(shape.into())
}
