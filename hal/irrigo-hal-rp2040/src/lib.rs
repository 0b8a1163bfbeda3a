//! RP2040-specific HAL for the irrigation controller firmware
//!
//! This crate provides RP2040 implementations of the shared `irrigo-hal`
//! traits on top of embassy-rp blocking drivers, plus pin-map checks:
//!
//! - Push-pull and open-drain GPIO wrappers
//! - ADC channel reads scaled to 16 bits
//! - PWM tone output with frequency/duty control
//! - Blocking I2C master
//! - Pin allocation and capability checks for `HardwareConfig`

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod i2c;
pub mod pins;
pub mod pwm;

pub use adc::{AdcChannel, RpAnalogInput};
pub use gpio::{RpOpenDrain, RpOutput};
pub use i2c::RpI2c;
pub use pins::{check_pins, PinError};
pub use pwm::{PwmChannel, RpPwm};
