//! Data models for lexpose
//!
//! Camera constraints and settings, photographer priorities and the
//! parameters shared by the metering, selection and allocation stages.

mod camera;
mod exposure;
mod profile;

pub use camera::{CameraSettings, CapturedExposure, Constraints, Preference};
pub use exposure::{AePriorities, AllocationPolicy, MeteringMode, SweepRange, MIN_EV_STEP};
pub use profile::CameraProfile;
