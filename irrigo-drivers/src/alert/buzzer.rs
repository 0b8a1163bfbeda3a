//! Passive buzzer on a PWM output
//!
//! Tones are produced by running the PWM at the carrier frequency with a
//! non-zero duty; duty sets loudness. Silence is duty 0.

use embedded_hal::delay::DelayNs;
use irrigo_core::alert::AlertPulse;
use irrigo_core::traits::{AlertError, AlertOutput};
use irrigo_hal::PwmOutput;

/// Blocking PWM buzzer
pub struct PwmBuzzer<P, D> {
    pwm: P,
    delay: D,
    /// Carrier used when a pulse has no override (Hz)
    default_hz: u32,
    /// Carrier currently programmed (Hz)
    current_hz: u32,
}

impl<P: PwmOutput, D: DelayNs> PwmBuzzer<P, D> {
    /// Create a buzzer, silent, at `default_hz`
    pub fn new(mut pwm: P, delay: D, default_hz: u32) -> Self {
        pwm.set_frequency(default_hz);
        pwm.set_duty_u16(0);
        Self {
            pwm,
            delay,
            default_hz,
            current_hz: default_hz,
        }
    }

    fn tune(&mut self, hz: u32) {
        if self.current_hz != hz {
            self.pwm.set_frequency(hz);
            self.current_hz = hz;
        }
    }
}

impl<P: PwmOutput, D: DelayNs> AlertOutput for PwmBuzzer<P, D> {
    fn pulse(&mut self, pulse: &AlertPulse) -> Result<u32, AlertError> {
        let hz = pulse.frequency_hz.unwrap_or(self.default_hz);
        if hz == 0 {
            return Err(AlertError::OutputFault);
        }
        if pulse.duration_ms == 0 || pulse.duty == 0 {
            return Ok(0);
        }

        self.tune(hz);
        self.pwm.set_duty_u16(pulse.duty);
        self.delay.delay_ms(pulse.duration_ms);
        self.pwm.set_duty_u16(0);

        // Overrides last one pulse only
        self.tune(self.default_hz);

        Ok(pulse.duration_ms)
    }

    fn rest(&mut self, ms: u32) -> u32 {
        self.delay.delay_ms(ms);
        ms
    }

    fn silence(&mut self) -> Result<(), AlertError> {
        self.pwm.set_duty_u16(0);
        Ok(())
    }
}
