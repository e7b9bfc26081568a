// Utility functions module
pub mod date_format;
pub mod logging;

pub use date_format::{format_age, parse_timezone, DateFormat, DateFormatter};
