//! Display abstraction and status screen for Irrigo
//!
//! This crate provides:
//! - `DisplayBackend` trait for character-addressed panels (SSD1306 OLED, etc.)
//! - `Screen` text buffer with change tracking
//! - `StatusScreen`, which lays out sensor readings and pump state and
//!   implements the core `StatusDisplay` collaborator
//!
//! # Architecture
//!
//! The control loop only knows `StatusDisplay`. `StatusScreen` turns a
//! snapshot into text lines and pushes them through whatever
//! `DisplayBackend` the board provides, so the layout can be tested on the
//! host without a panel.

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod screen;
pub mod status;

// Re-export key types
pub use backend::{DisplayBackend, DisplayError};
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
pub use status::StatusScreen;
