//! Exposure allocation
//!
//! Converts a target EV into realizable shutter, aperture and ISO values and
//! estimates the EV range a camera can reach cleanly.

mod allocator;
mod quantize;
mod range;


pub use allocator::{
    allocate, allocate_with_policy, Allocation, AllocationLog, ConstraintHit, EvBreakdown,
};
pub use quantize::{
    aperture_from_ev, ev_from_aperture, ev_from_iso, ev_from_shutter, floor_stop, iso_from_ev,
    quantize_ev, shutter_from_ev, snap_to_stops, APERTURE_STOPS, BASE_APERTURE, BASE_ISO,
    BASE_SHUTTER, ISO_STOPS,
};
pub use range::{
    ev_range_from_constraints, ev_range_with_policy, range_scan_points, EvRange, FALLBACK_RANGE,
    RANGE_SCAN_MAX, RANGE_SCAN_MIN,
};

use crate::models::CapturedExposure;

/// EV of a captured exposure relative to the base 1/60 s, f/2.8, ISO 100.
pub fn exposure_ev(captured: &CapturedExposure) -> f64 {
    ev_from_shutter(captured.shutter_seconds)
        + ev_from_aperture(captured.aperture)
        + ev_from_iso(captured.iso)
}
