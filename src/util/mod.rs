//! Utilities: wire date formatting and identifier decoding.

pub mod date;
pub mod id;

pub use date::{format_iso8601, parse_calendar_date, parse_iso8601};
