//! Display panel drivers

mod ssd1306;

pub use ssd1306::{Framebuffer, Ssd1306, SSD1306_ADDR};
