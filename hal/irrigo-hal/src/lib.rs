//! Irrigo Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that chip-specific HALs
//! implement. Drivers in `irrigo-drivers` are written against these traits
//! only, so they can be unit tested on the host with mock pins.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (irrigo-firmware)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  irrigo-drivers (relay, buzzer, DHT22)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  irrigo-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌─────────────────┐
//!            │ irrigo-hal-     │
//!            │    rp2040       │
//!            └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`], [`gpio::OpenDrainPin`] - Digital I/O
//! - [`adc::AnalogInput`] - Single ADC channel
//! - [`pwm::PwmOutput`] - PWM slice driving a tone output
//! - [`i2c::I2cBus`] - I2C bus operations
//!
//! Blocking delays come from `embedded_hal::delay::DelayNs`, which every
//! chip HAL already implements.

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod gpio;
pub mod i2c;
pub mod pwm;

// Re-export key traits at crate root for convenience
pub use adc::{AdcError, AnalogInput};
pub use gpio::{InputPin, OpenDrainPin, OutputPin};
pub use i2c::{I2cBus, I2cConfig, I2cError};
pub use pwm::PwmOutput;
