//! Board-agnostic core logic for the irrigation controller firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Collaborator traits (soil/climate sensors, pump, buzzer, display, clock)
//! - Moisture mapping and per-cycle sensor snapshots
//! - Pump decision state machine (hysteresis + minimum-on debounce)
//! - Critical alert evaluation and buzzer patterns
//! - Cadence scheduler driving one control cycle per sensor period
//! - Configuration types, parsing and validation
//!
//! Fractional quantities are carried as ×10 fixed point: soil moisture in
//! 0.1 % steps (0..=1000), temperature in 0.1 °C, humidity in 0.1 %RH.

#![no_std]
#![deny(unsafe_code)]

pub mod alert;
pub mod config;
pub mod control;
pub mod scheduler;
pub mod sensor;
pub mod traits;
