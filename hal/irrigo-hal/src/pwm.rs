//! PWM output abstraction

/// PWM channel driving a passive buzzer or similar tone output
pub trait PwmOutput {
    /// Set the PWM carrier frequency in Hz
    fn set_frequency(&mut self, hz: u32);

    /// Set the duty cycle on a 16-bit scale (0 = off, 65535 = always high)
    fn set_duty_u16(&mut self, duty: u16);
}
