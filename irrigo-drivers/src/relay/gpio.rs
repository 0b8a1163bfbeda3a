//! GPIO pump relay
//!
//! Relay module driven directly from a GPIO. Most hobby relay boards are
//! active-low: the pump runs while the pin is LOW.

use irrigo_core::traits::{ActuatorError, PumpActuator};
use irrigo_hal::OutputPin;

/// GPIO relay output
///
/// Translates logical ON/OFF to a pin level. The pin level is read back
/// after every write so a pin that did not take the level is reported.
pub struct GpioRelay<P> {
    pin: P,
    /// If true, pump ON = pin LOW
    inverted: bool,
    /// Current logical state (true = pump on)
    on: bool,
}

impl<P: OutputPin> GpioRelay<P> {
    /// Create a new relay output, driven off
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, the pump is ON when the pin is LOW (active-low boards)
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut relay = Self {
            pin,
            inverted,
            on: false,
        };
        relay.drive(false);
        relay
    }

    /// Pin level that corresponds to a logical state
    fn level_for(&self, on: bool) -> bool {
        // Normal: on → high. Inverted: on → low
        on != self.inverted
    }

    fn drive(&mut self, on: bool) {
        let level = self.level_for(on);
        self.pin.set_state(level);
    }
}

impl<P: OutputPin> PumpActuator for GpioRelay<P> {
    fn set_on(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.drive(on);

        if self.pin.is_set_high() != self.level_for(on) {
            return Err(ActuatorError::OutputFault);
        }

        self.on = on;
        Ok(())
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock GPIO pin for testing
    struct MockPin {
        high: bool,
        stuck: Option<bool>,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                high: false,
                stuck: None,
            }
        }
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = self.stuck.unwrap_or(true);
        }

        fn set_low(&mut self) {
            self.high = self.stuck.unwrap_or(false);
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_active_high_relay() {
        let mut relay = GpioRelay::new(MockPin::new(), false);

        // Initially off
        assert!(!relay.is_on());
        assert!(!relay.pin.is_set_high());

        relay.set_on(true).unwrap();
        assert!(relay.is_on());
        assert!(relay.pin.is_set_high());

        relay.set_on(false).unwrap();
        assert!(!relay.is_on());
        assert!(!relay.pin.is_set_high());
    }

    #[test]
    fn test_active_low_relay() {
        let mut relay = GpioRelay::new(MockPin::new(), true);

        // Initially off (pin is high for active-low)
        assert!(!relay.is_on());
        assert!(relay.pin.is_set_high());

        // On pulls the pin low
        relay.set_on(true).unwrap();
        assert!(relay.is_on());
        assert!(!relay.pin.is_set_high());

        relay.set_on(false).unwrap();
        assert!(!relay.is_on());
        assert!(relay.pin.is_set_high());
    }

    #[test]
    fn test_idempotent() {
        let mut relay = GpioRelay::new(MockPin::new(), true);
        relay.set_on(true).unwrap();
        relay.set_on(true).unwrap();
        assert!(relay.is_on());
        assert!(!relay.pin.is_set_high());
    }

    #[test]
    fn test_stuck_pin_reported() {
        let mut pin = MockPin::new();
        pin.stuck = Some(true);
        let mut relay = GpioRelay::new(pin, true);

        assert_eq!(relay.set_on(true), Err(ActuatorError::OutputFault));
        assert!(!relay.is_on());
    }

    #[test]
    fn test_actuator_trait() {
        let mut relay = GpioRelay::new(MockPin::new(), false);

        fn check<A: PumpActuator>(a: &mut A) {
            assert!(!a.is_on());
            a.set_on(true).unwrap();
            assert!(a.is_on());
        }

        check(&mut relay);
    }
}
