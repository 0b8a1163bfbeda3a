//! Screen buffer types
//!
//! Provides a character-based screen buffer for text-mode displays.

use heapless::String;

use crate::backend::{DisplayBackend, DisplayError};

/// Number of character rows (128x64 panel, 8 px per row)
pub const SCREEN_ROWS: usize = 8;

/// Number of character columns (128 px, 6 px per glyph)
pub const SCREEN_COLS: usize = 21;

/// Maximum characters per line
pub const LINE_LEN: usize = SCREEN_COLS;

/// Screen buffer for text-mode displays
///
/// Tracks whether any line changed since the last successful draw so
/// unchanged frames cost no bus traffic.
#[derive(Clone)]
pub struct Screen {
    /// Current display content
    lines: [String<LINE_LEN>; SCREEN_ROWS],
    /// Whether the screen needs to be redrawn
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Create a new empty screen
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            dirty: true,
        }
    }

    /// Clear the entire screen
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            if !line.is_empty() {
                line.clear();
                self.dirty = true;
            }
        }
    }

    /// Set the content of a specific row
    ///
    /// Text longer than a line is truncated. Only marks the screen dirty
    /// if the content actually changed.
    pub fn set_line(&mut self, row: usize, text: &str) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };

        let text = truncate(text, LINE_LEN);
        if line.as_str() != text {
            line.clear();
            let _ = line.push_str(text);
            self.dirty = true;
        }
    }

    /// Get the content of a specific row
    pub fn get_line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    /// Check if screen needs redrawing
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark screen as clean (after rendering)
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Mark screen as dirty (needs redraw)
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Get all lines as an iterator
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|s| s.as_str())
    }

    /// Draw the whole buffer to a backend and flush it
    ///
    /// The screen stays dirty if any step fails so the next draw retries.
    pub fn draw<B: DisplayBackend + ?Sized>(&mut self, backend: &mut B) -> Result<(), DisplayError> {
        backend.clear()?;
        for (row, line) in self.lines.iter().enumerate() {
            if !line.is_empty() {
                backend.draw_text(row as u8, 0, line)?;
            }
        }
        backend.flush()?;
        self.dirty = false;
        Ok(())
    }
}

/// Cut `text` to at most `max` bytes on a char boundary
fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_line_truncates() {
        let mut screen = Screen::new();
        screen.set_line(0, "0123456789012345678901234");
        assert_eq!(screen.get_line(0), Some("012345678901234567890"));
        assert_eq!(screen.get_line(0).map(str::len), Some(SCREEN_COLS));
    }

    #[test]
    fn test_set_line_out_of_range_ignored() {
        let mut screen = Screen::new();
        screen.mark_clean();
        screen.set_line(SCREEN_ROWS, "nope");
        assert!(!screen.is_dirty());
        assert_eq!(screen.get_line(SCREEN_ROWS), None);
    }

    #[test]
    fn test_unchanged_line_stays_clean() {
        let mut screen = Screen::new();
        screen.set_line(1, "Pump: ON");
        screen.mark_clean();

        screen.set_line(1, "Pump: ON");
        assert!(!screen.is_dirty());

        screen.set_line(1, "Pump: OFF");
        assert!(screen.is_dirty());
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("°C°C", 4), "°C");
        assert_eq!(truncate("ab", 5), "ab");
    }
}
