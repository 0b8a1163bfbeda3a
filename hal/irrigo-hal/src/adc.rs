//! Analog input abstraction

/// Errors that can occur during an ADC conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// Conversion did not complete
    ConversionFailed,
}

/// A single ADC channel
pub trait AnalogInput {
    /// Read one sample scaled to the full 16-bit range (0..=65535)
    ///
    /// Chips with narrower converters left-shift their result, so callers
    /// can keep calibration values independent of ADC resolution.
    fn read_u16(&mut self) -> Result<u16, AdcError>;
}
