//! Inter-task communication channels
//!
//! Defines the static signals shared between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Stop request from the button task
///
/// The irrigation task finishes its current cycle, switches the pump off
/// and silences the buzzer before parking.
pub static STOP: Signal<CriticalSectionRawMutex, ()> = Signal::new();
