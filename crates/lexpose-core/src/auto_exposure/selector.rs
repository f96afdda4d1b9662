//! Lexicographic exposure selection
//!
//! Highlights are protected first, shadows second, and the midtone target is
//! only optimized among the candidates that survive both. A tolerance is
//! widened in fixed increments only when nothing satisfies it, and the
//! widening is local to this run: the caller's priorities are never touched.

use super::{AeSelection, AeTrace, Candidate, RelaxationStep, SelectionLevel};
use crate::models::AePriorities;
use crate::verbose_println;

/// Amount a clipping tolerance widens per relaxation step.
pub const RELAXATION_INCREMENT: f64 = 0.05;

/// Tolerance beyond which no further relaxation happens.
pub const RELAXATION_CAP: f64 = 1.0;

/// Outcome of filtering one candidate pool against one tolerance.
struct StageOutcome {
    feasible: Vec<usize>,
    tolerance: f64,
    steps: Vec<RelaxationStep>,
}

/// Keep the members of `pool` whose `metric` is within `tolerance`, widening
/// the tolerance by [`RELAXATION_INCREMENT`] up to [`RELAXATION_CAP`] while
/// the result is empty. Each widening is recorded with the EVs it admits.
fn filter_with_relaxation<M>(
    candidates: &[Candidate],
    pool: &[usize],
    configured: f64,
    metric: M,
) -> StageOutcome
where
    M: Fn(&Candidate) -> f64,
{
    let feasible_at = |tolerance: f64| -> Vec<usize> {
        pool.iter()
            .copied()
            .filter(|&i| metric(&candidates[i]) <= tolerance)
            .collect()
    };

    let mut tolerance = configured;
    let mut feasible = feasible_at(tolerance);
    let mut steps = Vec::new();

    let mut k = 0u32;
    while feasible.is_empty() && !pool.is_empty() && tolerance < RELAXATION_CAP {
        k += 1;
        tolerance = (configured + k as f64 * RELAXATION_INCREMENT).min(RELAXATION_CAP);
        feasible = feasible_at(tolerance);
        steps.push(RelaxationStep {
            tolerance,
            feasible_evs: feasible.iter().map(|&i| candidates[i].ev).collect(),
        });
    }

    StageOutcome {
        feasible,
        tolerance,
        steps,
    }
}

/// First index in `pool` with the smallest midtone error. Ties keep the
/// earliest EV.
fn argmin_midtone(candidates: &[Candidate], pool: &[usize]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for &i in pool {
        match best {
            Some(b) if candidates[i].midtone_error < candidates[b].midtone_error => {
                best = Some(i)
            }
            None => best = Some(i),
            _ => {}
        }
    }
    best
}

/// Run the three-stage lexicographic selection over swept candidates.
///
/// Extended candidates are carried in the trace for display but never enter
/// a feasible set or the final choice. The selector always produces an EV;
/// degraded decisions are flagged in the trace instead of failing.
pub fn select_exposure(candidates: Vec<Candidate>, priorities: &AePriorities) -> AeSelection {
    let selectable: Vec<usize> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.extended)
        .map(|(i, _)| i)
        .collect();

    // Stage 1: highlights
    let stage1 = filter_with_relaxation(
        &candidates,
        &selectable,
        priorities.eta_highlight,
        |c| c.highlight_clip,
    );
    if !stage1.steps.is_empty() {
        verbose_println!(
            "[lexpose] Highlight tolerance relaxed {} time(s): {:.2} -> {:.2}",
            stage1.steps.len(),
            priorities.eta_highlight,
            stage1.tolerance
        );
    }

    // Stage 2: shadows, only among highlight-feasible candidates
    let stage2 = filter_with_relaxation(
        &candidates,
        &stage1.feasible,
        priorities.eta_shadow,
        |c| c.shadow_clip,
    );
    if !stage2.steps.is_empty() {
        verbose_println!(
            "[lexpose] Shadow tolerance relaxed {} time(s): {:.2} -> {:.2}",
            stage2.steps.len(),
            priorities.eta_shadow,
            stage2.tolerance
        );
    }

    // Stage 3: midtone error within the most constrained non-empty pool
    let (pool, level) = if !stage2.feasible.is_empty() {
        (&stage2.feasible, SelectionLevel::Stage2)
    } else if !stage1.feasible.is_empty() {
        (&stage1.feasible, SelectionLevel::Stage1)
    } else {
        (&selectable, SelectionLevel::Unconstrained)
    };

    let chosen_index = argmin_midtone(&candidates, pool);
    let chosen_ev = chosen_index.map(|i| candidates[i].ev).unwrap_or(0.0);

    let chosen_reason = describe_choice(
        &candidates,
        chosen_index,
        level,
        pool.len(),
        priorities,
        &stage1,
        &stage2,
    );
    if level != SelectionLevel::Stage2 {
        verbose_println!("[lexpose] {}", chosen_reason);
    }

    let trace = AeTrace {
        stage1_feasible: stage1.feasible,
        stage2_feasible: stage2.feasible,
        highlight_relaxation: stage1.steps,
        shadow_relaxation: stage2.steps,
        eta_highlight_used: stage1.tolerance,
        eta_shadow_used: stage2.tolerance,
        chosen_index,
        chosen_ev,
        selection_level: level,
        chosen_reason,
        candidates,
    };

    AeSelection { chosen_ev, trace }
}

fn describe_choice(
    candidates: &[Candidate],
    chosen_index: Option<usize>,
    level: SelectionLevel,
    pool_size: usize,
    priorities: &AePriorities,
    stage1: &StageOutcome,
    stage2: &StageOutcome,
) -> String {
    let Some(index) = chosen_index else {
        return "No candidates were swept; defaulting to EV 0".to_string();
    };
    let chosen = &candidates[index];

    let mut reason = match level {
        SelectionLevel::Stage2 => format!(
            "EV {:+.2} minimizes midtone error ({:.5}, median {:.3}) among {} candidate(s) \
             with highlight clip <= {:.2} and shadow clip <= {:.2}",
            chosen.ev,
            chosen.midtone_error,
            chosen.median,
            pool_size,
            stage1.tolerance,
            stage2.tolerance
        ),
        SelectionLevel::Stage1 => format!(
            "Shadow constraint unsatisfiable; EV {:+.2} minimizes midtone error ({:.5}) among {} \
             candidate(s) with highlight clip <= {:.2}",
            chosen.ev, chosen.midtone_error, pool_size, stage1.tolerance
        ),
        SelectionLevel::Unconstrained => format!(
            "No clipping constraint satisfiable; EV {:+.2} is the global midtone minimum ({:.5})",
            chosen.ev, chosen.midtone_error
        ),
    };

    if !stage1.steps.is_empty() {
        reason.push_str(&format!(
            "; highlight tolerance relaxed from {:.2} to {:.2} in {} step(s)",
            priorities.eta_highlight,
            stage1.tolerance,
            stage1.steps.len()
        ));
    }
    if !stage2.steps.is_empty() {
        reason.push_str(&format!(
            "; shadow tolerance relaxed from {:.2} to {:.2} in {} step(s)",
            priorities.eta_shadow,
            stage2.tolerance,
            stage2.steps.len()
        ));
    }

    reason
}
