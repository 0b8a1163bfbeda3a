//! Sensor processing
//!
//! Turns raw sensor values into calibrated readings and fuses one soil read
//! and one climate read into the snapshot a control cycle works from.

pub mod moisture;
pub mod snapshot;

pub use moisture::{raw_to_percent_x10, raw_to_percent_x10_ceil, PERCENT_X10_MAX};
pub use snapshot::{capture, Capture, SensorSnapshot};
