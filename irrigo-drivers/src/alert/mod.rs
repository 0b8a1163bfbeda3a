//! Audible alert drivers

mod buzzer;

pub use buzzer::PwmBuzzer;
