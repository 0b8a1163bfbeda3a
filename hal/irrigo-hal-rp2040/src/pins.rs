//! Pin allocation and capability checks
//!
//! Catches pin maps the RP2040 cannot wire: two functions on one GPIO, an
//! analog sensor on a pin without an ADC, or display lines that do not
//! belong to the same I2C block.

use heapless::FnvIndexSet;
use irrigo_core::config::HardwareConfig;

use crate::adc::AdcChannel;
use crate::gpio::GPIO_COUNT;

/// Pin map problems
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// GPIO number past the last pin
    OutOfRange(u8),
    /// GPIO assigned to more than one function
    Duplicate(u8),
    /// Soil sensor pin has no ADC channel
    NotAdcCapable(u8),
    /// SDA/SCL are not an I2C0 or I2C1 pair
    I2cPins {
        /// Data pin
        sda: u8,
        /// Clock pin
        scl: u8,
    },
}

/// GPIO allocator to track pin usage
pub struct GpioAllocator {
    /// Set of allocated GPIO pins
    allocated: FnvIndexSet<u8, 32>,
}

impl Default for GpioAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GpioAllocator {
    /// Create a new GPIO allocator
    pub fn new() -> Self {
        Self {
            allocated: FnvIndexSet::new(),
        }
    }

    /// Allocate a GPIO pin
    pub fn allocate(&mut self, pin: u8) -> Result<(), PinError> {
        if pin >= GPIO_COUNT {
            return Err(PinError::OutOfRange(pin));
        }
        if self.allocated.contains(&pin) {
            return Err(PinError::Duplicate(pin));
        }
        // Capacity exceeds GPIO_COUNT
        let _ = self.allocated.insert(pin);
        Ok(())
    }

    /// Check if a pin is allocated
    pub fn is_allocated(&self, pin: u8) -> bool {
        self.allocated.contains(&pin)
    }

    /// Get the number of allocated pins
    pub fn allocated_count(&self) -> usize {
        self.allocated.len()
    }
}

/// I2C block an SDA/SCL pair belongs to
pub fn i2c_block(sda: u8, scl: u8) -> Option<u8> {
    match (sda % 4, scl % 4) {
        (0, 1) => Some(0),
        (2, 3) => Some(1),
        _ => None,
    }
}

/// Check a pin map against RP2040 capabilities
pub fn check_pins(hw: &HardwareConfig) -> Result<(), PinError> {
    let mut alloc = GpioAllocator::new();
    for pin in [
        hw.soil_adc_pin,
        hw.dht_pin,
        hw.relay_pin,
        hw.buzzer_pin,
        hw.i2c_sda_pin,
        hw.i2c_scl_pin,
        hw.stop_pin,
    ] {
        alloc.allocate(pin.pin)?;
    }

    if AdcChannel::from_gpio(hw.soil_adc_pin.pin).is_none() {
        return Err(PinError::NotAdcCapable(hw.soil_adc_pin.pin));
    }

    let (sda, scl) = (hw.i2c_sda_pin.pin, hw.i2c_scl_pin.pin);
    if i2c_block(sda, scl).is_none() {
        return Err(PinError::I2cPins { sda, scl });
    }

    Ok(())
}
