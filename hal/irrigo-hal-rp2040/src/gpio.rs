//! GPIO wrappers

use embassy_rp::gpio::{Flex, Output, Pull};
use irrigo_hal::{InputPin, OpenDrainPin, OutputPin};

/// Maximum number of GPIO pins on RP2040
pub const GPIO_COUNT: u8 = 30;

/// Push-pull output
pub struct RpOutput<'d>(Output<'d>);

impl<'d> RpOutput<'d> {
    /// Wrap an embassy output
    pub fn new(pin: Output<'d>) -> Self {
        Self(pin)
    }
}

impl OutputPin for RpOutput<'_> {
    fn set_high(&mut self) {
        self.0.set_high();
    }

    fn set_low(&mut self) {
        self.0.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.0.is_set_high()
    }
}

/// Open-drain line emulated on a flex pin
///
/// Driving low switches the pin to an output at LOW; releasing switches it
/// back to an input so the pull-up (internal, plus the module's external
/// one) idles the line high.
pub struct RpOpenDrain<'d>(Flex<'d>);

impl<'d> RpOpenDrain<'d> {
    /// Configure a flex pin as a released open-drain line
    pub fn new(mut pin: Flex<'d>) -> Self {
        pin.set_pull(Pull::Up);
        pin.set_low();
        pin.set_as_input();
        Self(pin)
    }
}

impl InputPin for RpOpenDrain<'_> {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

impl OpenDrainPin for RpOpenDrain<'_> {
    fn drive_low(&mut self) {
        self.0.set_low();
        self.0.set_as_output();
    }

    fn release(&mut self) {
        self.0.set_as_input();
    }
}
