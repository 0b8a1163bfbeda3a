//! Blocking I2C master

use embassy_rp::i2c::{Blocking, I2c, Instance};
use embedded_hal::i2c::{Error as _, ErrorKind};
use irrigo_hal::i2c::{I2cBus, I2cError};

/// Blocking I2C bus
pub struct RpI2c<'d, T: Instance>(I2c<'d, T, Blocking>);

impl<'d, T: Instance> RpI2c<'d, T> {
    /// Wrap a configured embassy I2C peripheral
    pub fn new(i2c: I2c<'d, T, Blocking>) -> Self {
        Self(i2c)
    }
}

fn map_error(kind: ErrorKind) -> I2cError {
    match kind {
        ErrorKind::NoAcknowledge(_) => I2cError::Nack,
        _ => I2cError::Bus,
    }
}

impl<T: Instance> I2cBus for RpI2c<'_, T> {
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), I2cError> {
        embedded_hal::i2c::I2c::write(&mut self.0, address, data).map_err(|e| map_error(e.kind()))
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), I2cError> {
        embedded_hal::i2c::I2c::write_read(&mut self.0, address, write_data, read_buf)
            .map_err(|e| map_error(e.kind()))
    }
}
