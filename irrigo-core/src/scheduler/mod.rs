//! Cadence scheduler
//!
//! Runs one control cycle per sensor period in a fixed order:
//!
//! 1. Capture a sensor snapshot
//! 2. Play the critical pattern if the snapshot is critical
//! 3. Decide the pump transition, drive the actuator, play its pulse
//! 4. Refresh the display if its own period has elapsed
//! 5. Compute how long to idle before the next cycle
//!
//! Everything blocks. Alerts and the display report the time they consumed
//! so the idle time comes out of an explicit budget.

mod budget;
mod cadence;

pub use budget::{CycleBudget, IdlePlan};
pub use cadence::{CadenceScheduler, CycleFault, CycleReport, Drivers, ShutdownReport, MAX_FAULTS};
