//! Achievable EV range of a camera under a given preference.

use serde::{Deserialize, Serialize};

use super::allocator::allocate_with_policy;
use crate::models::{AllocationPolicy, Constraints, Preference, MIN_EV_STEP};

/// Lowest EV sampled when scanning the allocator.
pub const RANGE_SCAN_MIN: f64 = -10.0;
/// Highest EV sampled when scanning the allocator.
pub const RANGE_SCAN_MAX: f64 = 15.0;
/// Range reported when no sampled EV allocates cleanly.
pub const FALLBACK_RANGE: EvRange = EvRange {
    min: -6.0,
    max: 6.0,
};

/// Closed EV interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvRange {
    pub min: f64,
    pub max: f64,
}

impl EvRange {
    pub fn contains(&self, ev: f64) -> bool {
        ev >= self.min && ev <= self.max
    }

    /// Pull `ev` into the interval. NaN maps to the lower end.
    pub fn clamp(&self, ev: f64) -> f64 {
        if ev.is_nan() {
            self.min
        } else {
            ev.max(self.min).min(self.max)
        }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// EVs sampled by the range scan: -10 to +15 in quantization steps.
///
/// Steps finer than [`MIN_EV_STEP`] are raised to it.
pub fn range_scan_points(step: f64) -> Vec<f64> {
    let step = if step.is_finite() && step > 0.0 {
        step.max(MIN_EV_STEP)
    } else {
        1.0 / 3.0
    };
    let count = ((RANGE_SCAN_MAX - RANGE_SCAN_MIN) / step + 1e-9).floor() as usize + 1;
    (0..count)
        .map(|k| RANGE_SCAN_MIN + k as f64 * step)
        .collect()
}

/// Outer envelope of the sampled EVs that allocate without hitting a bound.
pub fn ev_range_from_constraints(constraints: &Constraints, preference: Preference) -> EvRange {
    ev_range_with_policy(constraints, preference, &AllocationPolicy::default())
}

/// As [`ev_range_from_constraints`] with an explicit split policy.
///
/// Gaps between the first and last clean sample are not excluded: the
/// result is the envelope, not a guaranteed-contiguous interval. When no
/// sample is clean, [`FALLBACK_RANGE`] is returned.
pub fn ev_range_with_policy(
    constraints: &Constraints,
    preference: Preference,
    policy: &AllocationPolicy,
) -> EvRange {
    let constraints = constraints.sanitized();
    let mut first: Option<f64> = None;
    let mut last: Option<f64> = None;

    for ev in range_scan_points(constraints.quantization_step) {
        let allocation = allocate_with_policy(ev, &constraints, preference, policy);
        if allocation.log.constraint_hits.is_empty() {
            first.get_or_insert(ev);
            last = Some(ev);
        }
    }

    match (first, last) {
        (Some(min), Some(max)) => EvRange { min, max },
        _ => FALLBACK_RANGE,
    }
}
