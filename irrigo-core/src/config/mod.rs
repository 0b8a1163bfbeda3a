//! Configuration types
//!
//! Board-agnostic configuration structures, the embedded TOML parser and
//! boot-time validation.

pub mod hardware;
pub mod parse;
pub mod types;
pub mod validate;

pub use hardware::*;
pub use parse::{parse_config, ParseError, ParseErrorKind};
pub use types::*;
pub use validate::{ConfigError, ConfigWarning, MAX_WARNINGS};
