//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the collaborator traits
//! defined in irrigo-core, written against the irrigo-hal traits:
//!
//! - Pump relay on a GPIO (either polarity)
//! - PWM buzzer
//! - Capacitive soil sensor on an ADC channel
//! - DHT22 temperature/humidity sensor (bit-banged single wire)
//! - SSD1306 128x64 OLED over I2C

#![no_std]
#![deny(unsafe_code)]

pub mod alert;
pub mod display;
pub mod relay;
pub mod sensor;
