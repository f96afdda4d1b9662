//! Lexpose Core Library
//!
//! Lexicographic auto-exposure: scene metering, constraint-relaxing EV
//! selection and allocation of the chosen EV to shutter, aperture and ISO.

pub mod allocation;
pub mod auto_exposure;
pub mod config;
pub mod metering;
pub mod models;
pub mod parallel;
pub mod pipeline;
pub mod profiles;
pub mod scenes;

// Re-export commonly used types
pub use allocation::{allocate, ev_range_from_constraints, Allocation, AllocationLog, EvRange};
pub use auto_exposure::{auto_expose, AeSelection, AeTrace, Candidate};
pub use metering::{generate_weight_map, MeteringStats, WeightMap};
pub use models::{
    AePriorities, AllocationPolicy, CameraProfile, CameraSettings, CapturedExposure, Constraints,
    MeteringMode, Preference, SweepRange,
};
pub use pipeline::{run_auto_exposure, ExposureDecision, ExposureRequest};
