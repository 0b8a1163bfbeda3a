//! Pump relay drivers

mod gpio;

pub use gpio::GpioRelay;
