//! Critical alert evaluation and buzzer patterns
//!
//! The critical overlay is stateless and has no authority over the pump.
//! It only decides whether a warning pattern is played this cycle.

mod critical;
mod pattern;

pub use critical::{evaluate_critical, CriticalCause};
pub use pattern::{pump_pulse, AlertPattern, AlertPulse, PatternFault};
