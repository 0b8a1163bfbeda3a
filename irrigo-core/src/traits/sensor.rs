//! Soil and climate sensor traits

/// Errors that can occur reading the climate sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EnvironmentError {
    /// Sensor did not answer or a bit timed out
    Timeout,
    /// Frame checksum mismatch
    Checksum,
    /// Decoded value outside the sensor's physical range
    OutOfRange,
}

/// One successful temperature/humidity sample
///
/// Both values come from the same conversion, so they are always present
/// or absent together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnvironmentReading {
    /// Air temperature (°C × 10)
    pub temperature_x10: i16,
    /// Relative humidity (%RH × 10)
    pub humidity_x10: u16,
}

/// Soil moisture sensor
pub trait SoilSensor {
    /// Read the raw sensor value on a 16-bit scale
    ///
    /// This read cannot fail; drivers over fallible converters must
    /// substitute a value rather than report an error.
    fn read_raw(&mut self) -> u16;
}

/// Temperature/humidity sensor
pub trait EnvironmentSensor {
    /// Trigger a conversion and read the result
    fn read(&mut self) -> Result<EnvironmentReading, EnvironmentError>;
}
