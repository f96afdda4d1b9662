//! EV candidate sweep
//!
//! Re-exposes the metered luminance at every EV of the sweep range and
//! records the clipping and midtone statistics of each result.

use super::Candidate;
use crate::metering::{clipping, scale_luminance, weighted_median};
use crate::models::{AePriorities, SweepRange, MIN_EV_STEP};
use crate::parallel::ordered_map;

/// Slack absorbing floating error when counting steps across the range.
const STEP_EPSILON: f64 = 1e-9;

/// Upper bound on the candidates of one sweep, extension included.
pub const MAX_SWEEP_CANDIDATES: usize = 4096;

/// Step actually walked: steps finer than [`MIN_EV_STEP`] are raised to it.
fn effective_step(range: &SweepRange) -> Option<f64> {
    if !range.step.is_finite() || range.step <= 0.0 {
        return None;
    }
    Some(range.step.max(MIN_EV_STEP))
}

/// Number of in-range candidates: `floor((max - min) / step) + 1`, capped at
/// [`MAX_SWEEP_CANDIDATES`].
pub fn candidate_count(range: &SweepRange) -> usize {
    let Some(step) = effective_step(range) else {
        return 0;
    };
    if !range.min.is_finite() || !range.max.is_finite() {
        return 0;
    }
    if range.max < range.min {
        return 0;
    }
    let steps = ((range.max - range.min) / step + STEP_EPSILON).floor();
    if steps >= (MAX_SWEEP_CANDIDATES - 1) as f64 {
        MAX_SWEEP_CANDIDATES
    } else {
        steps as usize + 1
    }
}

/// EVs to sweep, ascending, each flagged when it lies in the display-only
/// extension past `max`.
///
/// Every EV is computed as `min + k * step` so no error accumulates along
/// the sweep.
pub fn candidate_evs(range: &SweepRange) -> Vec<(f64, bool)> {
    let count = candidate_count(range);
    let Some(step) = effective_step(range) else {
        return Vec::new();
    };
    let mut evs: Vec<(f64, bool)> = (0..count)
        .map(|k| (range.min + k as f64 * step, false))
        .collect();

    if let Some(extend) = range.extend.filter(|e| *e > 0.0) {
        let limit = range.max + extend + STEP_EPSILON;
        let mut k = count;
        while k < MAX_SWEEP_CANDIDATES {
            let ev = range.min + k as f64 * step;
            if ev > limit {
                break;
            }
            evs.push((ev, true));
            k += 1;
        }
    }

    evs
}

/// Statistics of the scene re-exposed by `ev` stops.
pub fn evaluate_candidate(
    luminance: &[f32],
    weights: &[f32],
    ev: f64,
    priorities: &AePriorities,
    extended: bool,
) -> Candidate {
    let gain = 2f64.powf(ev) as f32;
    let scaled = scale_luminance(luminance, gain);
    let clip = clipping(&scaled, weights, priorities.epsilon_shadow);
    let median = weighted_median(&scaled, weights) as f64;
    let error = median - priorities.midtone_target;

    Candidate {
        ev,
        highlight_clip: clip.highlight_clip,
        shadow_clip: clip.shadow_clip,
        median,
        midtone_error: error * error,
        extended,
    }
}

/// Sweep every EV of `range`, in ascending order.
///
/// Candidates are independent of each other and may be evaluated on the
/// rayon pool; the returned order always matches the EV order.
pub fn sweep_candidates(
    luminance: &[f32],
    weights: &[f32],
    range: &SweepRange,
    priorities: &AePriorities,
) -> Vec<Candidate> {
    let evs = candidate_evs(range);
    ordered_map(&evs, luminance.len(), |&(ev, extended)| {
        evaluate_candidate(luminance, weights, ev, priorities, extended)
    })
}
