//! PWM tone output
//!
//! The counter wraps at `top`, so the carrier is
//! `clk_sys / (divider * (top + 1))`. The integer divider is chosen as the
//! smallest one that keeps `top` within 16 bits.

use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pwm::{Config, Pwm};
use irrigo_hal::PwmOutput;

/// Which output of the slice the buzzer is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmChannel {
    /// Even GPIO of the slice
    A,
    /// Odd GPIO of the slice
    B,
}

/// Divider and wrap value for a carrier frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Integer clock divider (1..=255)
    pub divider: u8,
    /// Counter wrap value
    pub top: u16,
}

/// Compute divider and wrap for `hz` from a `clk_hz` system clock
///
/// Returns `None` if the frequency is zero or out of reach.
pub fn timing_for(clk_hz: u32, hz: u32) -> Option<Timing> {
    if hz == 0 {
        return None;
    }

    let ticks = clk_hz / hz;
    let divider = ticks.div_ceil(1 << 16).max(1);
    if divider > u8::MAX as u32 {
        return None;
    }

    let top = (ticks / divider).checked_sub(1)?;
    Some(Timing {
        divider: divider as u8,
        top: u16::try_from(top).ok()?,
    })
}

/// Compare value for a 16-bit duty at a given wrap
fn compare_for(top: u16, duty: u16) -> u16 {
    ((top as u32 + 1) * duty as u32 / (u16::MAX as u32 + 1)) as u16
}

/// One PWM output driving a tone
pub struct RpPwm<'d> {
    pwm: Pwm<'d>,
    channel: PwmChannel,
    config: Config,
    duty: u16,
}

impl<'d> RpPwm<'d> {
    /// Wrap a configured slice; output starts silent
    pub fn new(pwm: Pwm<'d>, channel: PwmChannel) -> Self {
        let mut out = Self {
            pwm,
            channel,
            config: Config::default(),
            duty: 0,
        };
        out.apply();
        out
    }

    fn apply(&mut self) {
        let compare = compare_for(self.config.top, self.duty);
        match self.channel {
            PwmChannel::A => self.config.compare_a = compare,
            PwmChannel::B => self.config.compare_b = compare,
        }
        self.pwm.set_config(&self.config);
    }
}

impl PwmOutput for RpPwm<'_> {
    fn set_frequency(&mut self, hz: u32) {
        // Unreachable frequencies keep the previous carrier
        if let Some(t) = timing_for(clk_sys_freq(), hz) {
            self.config.divider = t.divider.into();
            self.config.top = t.top;
            self.apply();
        }
    }

    fn set_duty_u16(&mut self, duty: u16) {
        self.duty = duty;
        self.apply();
    }
}
