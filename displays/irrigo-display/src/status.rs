//! Status screen layout
//!
//! ```text
//! row 0  Smart Irrigation
//! row 2  Soil:  42% ADC:45080
//! row 4  T: 23.1C H: 48%        (or "DHT: read error")
//! row 6  Pump: ON
//! ```

use core::fmt::Write;

use heapless::String;
use irrigo_core::sensor::SensorSnapshot;
use irrigo_core::traits::{Clock, StatusDisplay};

use crate::backend::{DisplayBackend, DisplayError};
use crate::screen::{Screen, LINE_LEN};

const TITLE: &str = "Smart Irrigation";

const ROW_TITLE: usize = 0;
const ROW_SOIL: usize = 2;
const ROW_CLIMATE: usize = 4;
const ROW_PUMP: usize = 6;

/// Status screen rendered through a display backend
///
/// Owns its backend and a clock used to report how long a refresh held the
/// control loop.
pub struct StatusScreen<B, C> {
    backend: B,
    clock: C,
    screen: Screen,
}

impl<B: DisplayBackend, C: Clock> StatusScreen<B, C> {
    /// Create a status screen
    pub fn new(backend: B, clock: C) -> Self {
        Self {
            backend,
            clock,
            screen: Screen::new(),
        }
    }

    /// Text buffer as last composed
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Lay out the readings into the text buffer without drawing
    pub fn compose(&mut self, snapshot: &SensorSnapshot, pump_on: bool) {
        let mut line: String<LINE_LEN> = String::new();

        self.screen.set_line(ROW_TITLE, TITLE);

        let _ = write!(
            line,
            "Soil: {:>3}% ADC:{:>5}",
            round_x10(snapshot.soil_pct_x10),
            snapshot.soil_raw
        );
        self.screen.set_line(ROW_SOIL, &line);

        line.clear();
        match snapshot.environment {
            Some(env) => {
                let mut temp: String<8> = String::new();
                let _ = write_tenths(&mut temp, env.temperature_x10);
                let _ = write!(line, "T:{:>5}C H:{:>3}%", temp.as_str(), round_x10(env.humidity_x10));
            }
            None => {
                let _ = line.push_str("DHT: read error");
            }
        }
        self.screen.set_line(ROW_CLIMATE, &line);

        self.screen
            .set_line(ROW_PUMP, if pump_on { "Pump: ON" } else { "Pump: OFF" });
    }
}

impl<B: DisplayBackend, C: Clock> StatusDisplay for StatusScreen<B, C> {
    fn render(&mut self, snapshot: &SensorSnapshot, pump_on: bool) -> Result<u32, DisplayError> {
        if !self.backend.is_ready() {
            return Err(DisplayError::NotInitialized);
        }

        let start = self.clock.now_ms();
        self.compose(snapshot, pump_on);
        if self.screen.is_dirty() {
            self.screen.draw(&mut self.backend)?;
        }

        let spent = self.clock.now_ms().saturating_sub(start);
        Ok(u32::try_from(spent).unwrap_or(u32::MAX))
    }
}

/// Round a ×10 value to a whole number
fn round_x10(x10: u16) -> u16 {
    x10.saturating_add(5) / 10
}

/// Write a ×10 value with one decimal
fn write_tenths<W: Write>(out: &mut W, x10: i16) -> core::fmt::Result {
    let sign = if x10 < 0 { "-" } else { "" };
    let abs = x10.unsigned_abs();
    write!(out, "{}{}.{}", sign, abs / 10, abs % 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use irrigo_core::traits::EnvironmentReading;

    struct MockBackend {
        ready: bool,
        fail_flush: bool,
        rows: [Option<String<LINE_LEN>>; 8],
        flushes: u32,
    }

    impl MockBackend {
        fn new() -> Self {
            Self {
                ready: true,
                fail_flush: false,
                rows: Default::default(),
                flushes: 0,
            }
        }
    }

    impl DisplayBackend for MockBackend {
        fn clear(&mut self) -> Result<(), DisplayError> {
            self.rows = Default::default();
            Ok(())
        }

        fn draw_text(&mut self, row: u8, _col: u8, text: &str) -> Result<(), DisplayError> {
            self.rows[row as usize] = Some(String::try_from(text).unwrap());
            Ok(())
        }

        fn flush(&mut self) -> Result<(), DisplayError> {
            if self.fail_flush {
                return Err(DisplayError::Communication);
            }
            self.flushes += 1;
            Ok(())
        }

        fn dimensions(&self) -> (u8, u8) {
            (21, 8)
        }

        fn is_ready(&self) -> bool {
            self.ready
        }
    }

    struct StepClock(Cell<u64>);

    impl Clock for StepClock {
        // Each read advances 7 ms, standing in for bus time
        fn now_ms(&self) -> u64 {
            let t = self.0.get();
            self.0.set(t + 7);
            t
        }
    }

    fn snapshot(environment: Option<EnvironmentReading>) -> SensorSnapshot {
        SensorSnapshot {
            soil_pct_x10: 424,
            soil_ceil_pct_x10: 424,
            soil_raw: 45_000,
            environment,
            captured_at_ms: 0,
        }
    }

    fn row<'a>(s: &'a StatusScreen<MockBackend, StepClock>, r: usize) -> Option<&'a str> {
        s.backend().rows[r].as_ref().map(|l| l.as_str())
    }

    #[test]
    fn test_layout() {
        let mut s = StatusScreen::new(MockBackend::new(), StepClock(Cell::new(0)));
        let env = EnvironmentReading {
            temperature_x10: 231,
            humidity_x10: 476,
        };

        let spent = s.render(&snapshot(Some(env)), true).unwrap();
        assert_eq!(spent, 7);
        assert_eq!(row(&s, 0), Some("Smart Irrigation"));
        assert_eq!(row(&s, 2), Some("Soil:  42% ADC:45000"));
        assert_eq!(row(&s, 4), Some("T: 23.1C H: 48%"));
        assert_eq!(row(&s, 6), Some("Pump: ON"));
    }

    #[test]
    fn test_negative_temperature() {
        let mut s = StatusScreen::new(MockBackend::new(), StepClock(Cell::new(0)));
        let env = EnvironmentReading {
            temperature_x10: -5,
            humidity_x10: 1000,
        };
        s.compose(&snapshot(Some(env)), false);
        assert_eq!(s.screen().get_line(4), Some("T: -0.5C H:100%"));
        assert_eq!(s.screen().get_line(6), Some("Pump: OFF"));
    }

    #[test]
    fn test_missing_climate() {
        let mut s = StatusScreen::new(MockBackend::new(), StepClock(Cell::new(0)));
        s.render(&snapshot(None), false).unwrap();
        assert_eq!(row(&s, 4), Some("DHT: read error"));
    }

    #[test]
    fn test_unchanged_frame_skips_bus() {
        let mut s = StatusScreen::new(MockBackend::new(), StepClock(Cell::new(0)));
        s.render(&snapshot(None), false).unwrap();
        s.render(&snapshot(None), false).unwrap();
        assert_eq!(s.backend().flushes, 1);

        s.render(&snapshot(None), true).unwrap();
        assert_eq!(s.backend().flushes, 2);
    }

    #[test]
    fn test_not_ready() {
        let mut backend = MockBackend::new();
        backend.ready = false;
        let mut s = StatusScreen::new(backend, StepClock(Cell::new(0)));
        assert_eq!(
            s.render(&snapshot(None), false),
            Err(DisplayError::NotInitialized)
        );
    }

    #[test]
    fn test_failed_flush_retries() {
        let mut backend = MockBackend::new();
        backend.fail_flush = true;
        let mut s = StatusScreen::new(backend, StepClock(Cell::new(0)));

        assert_eq!(
            s.render(&snapshot(None), false),
            Err(DisplayError::Communication)
        );
        assert!(s.screen().is_dirty());
    }
}
