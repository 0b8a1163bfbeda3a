//! Collaborator traits
//!
//! These traits define the interface between the decision engine and the
//! hardware it reads from and drives. The engine owns one implementation of
//! each and never reaches hardware any other way.

pub mod actuator;
pub mod alert;
pub mod clock;
pub mod display;
pub mod sensor;

pub use actuator::{ActuatorError, PumpActuator};
pub use alert::{AlertError, AlertOutput};
pub use clock::Clock;
pub use display::{DisplayError, StatusDisplay};
pub use sensor::{EnvironmentError, EnvironmentReading, EnvironmentSensor, SoilSensor};
