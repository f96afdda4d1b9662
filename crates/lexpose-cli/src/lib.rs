//! Shared utilities for lexpose-cli
//!
//! Argument structs, parsers and command implementations behind the
//! `lexpose` binary.

pub mod args;
pub mod commands;
pub mod parsers;

// Re-export commonly used items at the crate root for convenience
pub use args::{CameraArgs, OutputArgs, OutputFormat, SweepArgs};
pub use parsers::{
    parse_aperture, parse_ev, parse_iso, parse_metering, parse_preference, parse_reference,
    parse_scene, parse_shutter,
};
