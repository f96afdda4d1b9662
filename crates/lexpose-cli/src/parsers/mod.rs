//! Parsing functions for CLI arguments.

mod exposure;
mod metering;

#[cfg(test)]
mod tests;

pub use exposure::{parse_aperture, parse_ev, parse_iso, parse_reference, parse_shutter};
pub use metering::{parse_metering, parse_preference, parse_scene};
