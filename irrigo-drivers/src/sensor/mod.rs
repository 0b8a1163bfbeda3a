//! Sensor drivers

pub mod dht22;
pub mod soil;

pub use dht22::{decode_frame, Dht22};
pub use soil::AdcSoilSensor;
