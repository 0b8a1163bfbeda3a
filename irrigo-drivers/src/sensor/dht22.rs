//! DHT22 (AM2302) temperature/humidity sensor
//!
//! Single-wire protocol, bit-banged on an open-drain pin:
//!
//! 1. Host holds the line low for at least 1 ms, then releases it
//! 2. Sensor answers with 80 µs low, 80 µs high
//! 3. 40 data bits follow, each a 50 µs low then a high whose length
//!    encodes the bit (~26 µs = 0, ~70 µs = 1)
//!
//! The frame is humidity (16 bit, ×10), temperature (15 bit magnitude plus
//! sign bit, ×10) and an 8-bit checksum.

use embedded_hal::delay::DelayNs;
use irrigo_core::traits::{EnvironmentError, EnvironmentReading, EnvironmentSensor};
use irrigo_hal::OpenDrainPin;

/// Host start pulse (µs)
const START_LOW_US: u32 = 1_100;

/// Longest any single phase may last before the read is abandoned (µs)
const PHASE_TIMEOUT_US: u32 = 100;

/// High phases longer than this are a 1 bit (µs)
const BIT_THRESHOLD_US: u32 = 40;

/// Sensor measurement range (×10)
const HUMIDITY_MAX_X10: u16 = 1000;
const TEMP_MIN_X10: i16 = -400;
const TEMP_MAX_X10: i16 = 800;

/// DHT22 driver
pub struct Dht22<P, D> {
    pin: P,
    delay: D,
}

impl<P: OpenDrainPin, D: DelayNs> Dht22<P, D> {
    /// Create a driver; the line is released so the pull-up idles it high
    pub fn new(mut pin: P, delay: D) -> Self {
        pin.release();
        Self { pin, delay }
    }

    /// Poll while the line stays at `level`
    ///
    /// Returns how long it stayed there (µs).
    fn wait_while(&mut self, level: bool) -> Result<u32, EnvironmentError> {
        let mut elapsed = 0;
        while self.pin.is_high() == level {
            if elapsed >= PHASE_TIMEOUT_US {
                return Err(EnvironmentError::Timeout);
            }
            self.delay.delay_us(1);
            elapsed += 1;
        }
        Ok(elapsed)
    }

    fn read_frame(&mut self) -> Result<[u8; 5], EnvironmentError> {
        self.pin.drive_low();
        self.delay.delay_us(START_LOW_US);
        self.pin.release();

        // Response: pull-up high, 80 µs low, 80 µs high
        self.wait_while(true)?;
        self.wait_while(false)?;
        self.wait_while(true)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            self.wait_while(false)?;
            let high_us = self.wait_while(true)?;
            if high_us > BIT_THRESHOLD_US {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }

        Ok(frame)
    }
}

impl<P: OpenDrainPin, D: DelayNs> EnvironmentSensor for Dht22<P, D> {
    fn read(&mut self) -> Result<EnvironmentReading, EnvironmentError> {
        let frame = self.read_frame();
        // Leave the line idle whatever happened
        self.pin.release();
        decode_frame(frame?)
    }
}

/// Decode a raw 5-byte DHT22 frame
pub fn decode_frame(frame: [u8; 5]) -> Result<EnvironmentReading, EnvironmentError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(EnvironmentError::Checksum);
    }

    let humidity_x10 = u16::from_be_bytes([frame[0], frame[1]]);

    let magnitude = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]) as i16;
    let temperature_x10 = if frame[2] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };

    if humidity_x10 > HUMIDITY_MAX_X10 || !(TEMP_MIN_X10..=TEMP_MAX_X10).contains(&temperature_x10) {
        return Err(EnvironmentError::OutOfRange);
    }

    Ok(EnvironmentReading {
        temperature_x10,
        humidity_x10,
    })
}
