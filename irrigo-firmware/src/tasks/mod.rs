//! Embassy async tasks
//!
//! - `irrigation_task`: runs the control cycle at the configured cadence
//! - `stop_button_task`: debounces the stop button and requests shutdown

mod irrigation;
mod stop_button;

pub use irrigation::{irrigation_task, Scheduler};
pub use stop_button::stop_button_task;
