//! Lexicographic auto-exposure
//!
//! Sweeps candidate EVs over a metered scene and picks one under clipping
//! tolerances and a midtone target.

mod selector;
mod sweep;
mod trace;

#[cfg(test)]
mod tests;

pub use selector::{select_exposure, RELAXATION_CAP, RELAXATION_INCREMENT};
pub use sweep::{
    candidate_count, candidate_evs, evaluate_candidate, sweep_candidates, MAX_SWEEP_CANDIDATES,
};
pub use trace::{AeSelection, AeTrace, Candidate, CandidateStage, RelaxationStep, SelectionLevel};

use crate::models::{AePriorities, SweepRange};

/// Sweep `range` over the weighted scene and select an EV.
///
/// The returned EV is relative to the exposure the luminance was captured
/// at: positive values brighten the scene.
pub fn auto_expose(
    luminance: &[f32],
    weights: &[f32],
    range: &SweepRange,
    priorities: &AePriorities,
) -> AeSelection {
    let candidates = sweep_candidates(luminance, weights, range, priorities);
    select_exposure(candidates, priorities)
}
