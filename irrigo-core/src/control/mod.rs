//! Pump control
//!
//! Explicit two-state machine deciding when the pump runs. Decisions are
//! pure; state only changes when the caller commits a decision the
//! actuator accepted.

pub mod pump;

pub use pump::{
    environment_demands_water, needs_irrigation, safe_to_stop, PumpAction, PumpController,
    PumpState, RunReason,
};
