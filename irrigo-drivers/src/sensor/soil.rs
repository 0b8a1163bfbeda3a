//! Capacitive soil moisture sensor on an ADC channel

use irrigo_core::traits::SoilSensor;
use irrigo_hal::AnalogInput;

/// Soil sensor read through a single ADC channel
///
/// Averages a short burst of conversions per read. If every conversion in
/// a burst fails, the last good value is returned; before any good value
/// that is the dry calibration endpoint, which maps to 0 % for either sensor
/// polarity and so asks for water rather than withholding it.
pub struct AdcSoilSensor<A> {
    adc: A,
    samples: u8,
    last_good: u16,
    failures: u32,
}

impl<A: AnalogInput> AdcSoilSensor<A> {
    /// Create a sensor averaging `samples` conversions per call
    ///
    /// `dry_raw` is the calibrated dry reading, used until the first
    /// conversion succeeds.
    pub fn with_oversampling(adc: A, samples: u8, dry_raw: u16) -> Self {
        Self {
            adc,
            samples: samples.max(1),
            last_good: dry_raw,
            failures: 0,
        }
    }

    /// Number of reads that fell back to the last good value
    pub fn failures(&self) -> u32 {
        self.failures
    }
}

impl<A: AnalogInput> SoilSensor for AdcSoilSensor<A> {
    fn read_raw(&mut self) -> u16 {
        let mut sum = 0u32;
        let mut count = 0u32;

        for _ in 0..self.samples {
            if let Ok(v) = self.adc.read_u16() {
                sum += v as u32;
                count += 1;
            }
        }

        if count == 0 {
            self.failures = self.failures.saturating_add(1);
            return self.last_good;
        }

        self.last_good = (sum / count) as u16;
        self.last_good
    }
}
