//! ADC channels
//!
//! RP2040 has a single 12-bit ADC with 5 channels:
//! - ADC0: GPIO26
//! - ADC1: GPIO27
//! - ADC2: GPIO28
//! - ADC3: GPIO29
//! - ADC4: Internal temperature sensor

use embassy_rp::adc::{Adc, Blocking, Channel};
use irrigo_hal::adc::{AdcError, AnalogInput};

/// Left shift that scales a 12-bit conversion to 16 bits
const SCALE_SHIFT: u32 = 4;

/// ADC channel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcChannel {
    /// ADC0 on GPIO26
    Adc0,
    /// ADC1 on GPIO27
    Adc1,
    /// ADC2 on GPIO28
    Adc2,
    /// ADC3 on GPIO29
    Adc3,
    /// Internal temperature sensor
    Temperature,
}

impl AdcChannel {
    /// Get the GPIO pin for this ADC channel
    pub fn gpio(&self) -> Option<u8> {
        match self {
            AdcChannel::Adc0 => Some(26),
            AdcChannel::Adc1 => Some(27),
            AdcChannel::Adc2 => Some(28),
            AdcChannel::Adc3 => Some(29),
            AdcChannel::Temperature => None,
        }
    }

    /// Get ADC channel from GPIO pin
    pub fn from_gpio(gpio: u8) -> Option<Self> {
        match gpio {
            26 => Some(AdcChannel::Adc0),
            27 => Some(AdcChannel::Adc1),
            28 => Some(AdcChannel::Adc2),
            29 => Some(AdcChannel::Adc3),
            _ => None,
        }
    }
}

/// One ADC channel with exclusive use of the converter
pub struct RpAnalogInput<'d> {
    adc: Adc<'d, Blocking>,
    channel: Channel<'d>,
}

impl<'d> RpAnalogInput<'d> {
    /// Pair the converter with a channel
    pub fn new(adc: Adc<'d, Blocking>, channel: Channel<'d>) -> Self {
        Self { adc, channel }
    }
}

impl AnalogInput for RpAnalogInput<'_> {
    fn read_u16(&mut self) -> Result<u16, AdcError> {
        self.adc
            .blocking_read(&mut self.channel)
            .map(scale_12bit)
            .map_err(|_| AdcError::ConversionFailed)
    }
}

/// Scale a 12-bit conversion to the 16-bit range
fn scale_12bit(raw: u16) -> u16 {
    (raw & 0x0FFF) << SCALE_SHIFT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpio_mapping() {
        assert_eq!(AdcChannel::from_gpio(27), Some(AdcChannel::Adc1));
        assert_eq!(AdcChannel::Adc1.gpio(), Some(27));
        assert_eq!(AdcChannel::from_gpio(13), None);
        assert_eq!(AdcChannel::Temperature.gpio(), None);
    }

    #[test]
    fn test_scale() {
        assert_eq!(scale_12bit(0), 0);
        assert_eq!(scale_12bit(0x0FFF), 0xFFF0);
        assert_eq!(scale_12bit(1875), 30_000);
    }
}
