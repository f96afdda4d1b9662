//! Tests for the candidate sweep and lexicographic selector

use super::*;
use crate::metering::WeightMap;
use crate::models::{AePriorities, SweepRange, MIN_EV_STEP};

fn uniform(n: usize) -> Vec<f32> {
    WeightMap::uniform(n, 1).as_slice().to_vec()
}

fn two_tone(low: f32, high: f32, n_each: usize) -> Vec<f32> {
    let mut lum = vec![low; n_each];
    lum.extend(vec![high; n_each]);
    lum
}

fn candidate(ev: f64, highlight: f64, shadow: f64, error: f64) -> Candidate {
    Candidate {
        ev,
        highlight_clip: highlight,
        shadow_clip: shadow,
        median: 0.18,
        midtone_error: error,
        extended: false,
    }
}

fn is_subset(sub: &[usize], sup: &[usize]) -> bool {
    sub.iter().all(|i| sup.contains(i))
}

fn evs_superset(later: &[f64], earlier: &[f64]) -> bool {
    earlier.iter().all(|ev| later.contains(ev))
}

#[test]
fn test_candidate_count_and_order() {
    let cases = [
        (SweepRange::new(-2.0, 2.0, 0.5), 9),
        (SweepRange::new(-6.0, 6.0, 1.0 / 3.0), 37),
        (SweepRange::new(0.0, 1.0, 0.3), 4),
        (SweepRange::new(1.0, 1.0, 0.5), 1),
    ];

    for (range, expected) in cases {
        assert_eq!(candidate_count(&range), expected, "{:?}", range);
        let evs = candidate_evs(&range);
        assert_eq!(evs.len(), expected);
        assert!(evs.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(evs.iter().all(|(_, extended)| !extended));
    }
}

#[test]
fn test_invalid_sweep_is_empty() {
    assert_eq!(candidate_count(&SweepRange::new(-1.0, 1.0, 0.0)), 0);
    assert_eq!(candidate_count(&SweepRange::new(2.0, 1.0, 0.5)), 0);
    assert_eq!(candidate_count(&SweepRange::new(-1.0, 1.0, f64::NAN)), 0);
}

#[test]
fn test_tiny_step_is_bounded() {
    // A nanostop step would otherwise ask for billions of candidates
    let range = SweepRange::new(-6.0, 6.0, 1e-9);
    assert_eq!(candidate_count(&range), 121);
    let evs = candidate_evs(&range.with_extension(1.0));
    assert_eq!(evs.len(), 131);
    assert!((evs[1].0 - evs[0].0 - MIN_EV_STEP).abs() < 1e-12);

    let wide = SweepRange::new(-1e12, 1e12, 1.0).with_extension(1e12);
    assert_eq!(candidate_count(&wide), MAX_SWEEP_CANDIDATES);
    assert_eq!(candidate_evs(&wide).len(), MAX_SWEEP_CANDIDATES);
}

#[test]
fn test_extension_candidates_are_flagged() {
    let range = SweepRange::new(-1.0, 1.0, 0.5).with_extension(1.0);
    let evs = candidate_evs(&range);

    assert_eq!(evs.len(), 7);
    assert!(evs[..5].iter().all(|(_, extended)| !extended));
    assert_eq!(evs[5], (1.5, true));
    assert_eq!(evs[6], (2.0, true));
}

#[test]
fn test_midtone_scene_selects_one_stop_up() {
    let lum = vec![0.09f32; 400];
    let weights = uniform(400);
    let priorities = AePriorities::default();

    let selection = auto_expose(
        &lum,
        &weights,
        &SweepRange::new(-2.0, 2.0, 1.0 / 3.0),
        &priorities,
    );

    assert!((selection.chosen_ev - 1.0).abs() < 1e-9, "chose {}", selection.chosen_ev);
    assert_eq!(selection.trace.selection_level, SelectionLevel::Stage2);
    assert!(!selection.trace.is_degraded());
    assert_eq!(selection.trace.relax_count_highlight(), 0);
    assert_eq!(selection.trace.relax_count_shadow(), 0);
    assert_eq!(selection.trace.eta_highlight_used, priorities.eta_highlight);
    assert!(selection.trace.chosen_reason.contains("EV +1.00"));
}

#[test]
fn test_over_bright_scene_relaxes_highlights() {
    let lum = two_tone(0.1, 4.0, 100);
    let weights = uniform(200);
    let priorities = AePriorities::default();
    let before = priorities;

    let selection = auto_expose(&lum, &weights, &SweepRange::new(-1.0, 1.0, 0.5), &priorities);
    let trace = &selection.trace;

    // Half the frame clips at every EV, so 0.02 must widen to 0.52
    assert!(trace.relax_count_highlight() > 0);
    assert_eq!(trace.relax_count_highlight(), 10);
    assert!(trace.eta_highlight_used > priorities.eta_highlight);
    let multiples = (trace.eta_highlight_used - priorities.eta_highlight) / RELAXATION_INCREMENT;
    assert!((multiples - multiples.round()).abs() < 1e-9);

    assert!(trace.highlight_relaxation[..9]
        .iter()
        .all(|step| step.feasible_evs.is_empty()));
    assert_eq!(trace.highlight_relaxation[9].feasible_evs.len(), 5);
    assert!(trace.is_degraded());
    assert!(trace.chosen_reason.contains("highlight tolerance relaxed"));

    assert_eq!(priorities, before);
}

#[test]
fn test_deep_shadows_relax_shadow_stage() {
    let lum = two_tone(0.001, 0.2, 100);
    let weights = uniform(200);
    let priorities = AePriorities::default();

    let selection = auto_expose(&lum, &weights, &SweepRange::new(-1.0, 1.0, 1.0), &priorities);
    let trace = &selection.trace;

    assert_eq!(trace.relax_count_highlight(), 0);
    assert!(trace.relax_count_shadow() >= 9);
    assert!(trace.eta_shadow_used >= 0.5);
    assert_eq!(trace.selection_level, SelectionLevel::Stage2);
    assert!(is_subset(&trace.stage2_feasible, &trace.stage1_feasible));
}

#[test]
fn test_feasible_sets_nest_and_relaxation_is_monotone() {
    let lum: Vec<f32> = (0..600).map(|i| 0.002 * 1.012f32.powi(i)).collect();
    let weights = uniform(600);
    let priorities = AePriorities {
        eta_highlight: 0.0,
        eta_shadow: 0.0,
        ..AePriorities::default()
    };

    let selection = auto_expose(&lum, &weights, &SweepRange::new(-4.0, 4.0, 0.25), &priorities);
    let trace = &selection.trace;
    let all: Vec<usize> = (0..trace.candidates.len()).collect();

    assert!(is_subset(&trace.stage1_feasible, &all));
    assert!(is_subset(&trace.stage2_feasible, &trace.stage1_feasible));

    for steps in [&trace.highlight_relaxation, &trace.shadow_relaxation] {
        for pair in steps.windows(2) {
            assert!(pair[1].tolerance > pair[0].tolerance);
            assert!(evs_superset(&pair[1].feasible_evs, &pair[0].feasible_evs));
        }
    }
}

#[test]
fn test_ties_prefer_lowest_ev() {
    let candidates = vec![
        candidate(-1.0, 0.0, 0.0, 0.01),
        candidate(0.0, 0.0, 0.0, 0.02),
        candidate(1.0, 0.0, 0.0, 0.01),
    ];

    let selection = select_exposure(candidates, &AePriorities::default());
    assert_eq!(selection.chosen_ev, -1.0);
    assert_eq!(selection.trace.chosen_index, Some(0));
}

#[test]
fn test_extended_candidates_never_selected() {
    let mut extended = candidate(2.0, 0.0, 0.0, 0.0);
    extended.extended = true;
    let candidates = vec![candidate(0.0, 0.0, 0.0, 0.5), extended];

    let selection = select_exposure(candidates, &AePriorities::default());
    assert_eq!(selection.chosen_ev, 0.0);
    assert!(!selection.trace.stage1_feasible.contains(&1));
    assert!(!selection.trace.stage2_feasible.contains(&1));
    assert_eq!(selection.trace.stage_of(1), CandidateStage::Initial);
}

#[test]
fn test_shadow_fallback_to_stage_one() {
    // Clip fractions above 1.0 stay infeasible even at the relaxation cap
    let candidates = vec![
        candidate(-1.0, 0.0, 1.5, 0.3),
        candidate(0.0, 0.0, 1.5, 0.1),
        candidate(1.0, 0.0, 1.5, 0.2),
    ];

    let selection = select_exposure(candidates, &AePriorities::default());
    let trace = &selection.trace;

    assert_eq!(trace.selection_level, SelectionLevel::Stage1);
    assert_eq!(selection.chosen_ev, 0.0);
    assert!(trace.stage2_feasible.is_empty());
    assert_eq!(trace.eta_shadow_used, RELAXATION_CAP);
    assert!(trace.chosen_reason.contains("Shadow constraint unsatisfiable"));
}

#[test]
fn test_unconstrained_fallback() {
    let candidates = vec![
        candidate(-1.0, 1.5, 0.0, 0.3),
        candidate(0.0, 1.5, 0.0, 0.2),
        candidate(1.0, 1.5, 0.0, 0.25),
    ];

    let selection = select_exposure(candidates, &AePriorities::default());
    assert_eq!(selection.trace.selection_level, SelectionLevel::Unconstrained);
    assert_eq!(selection.chosen_ev, 0.0);
    assert!(selection.trace.is_degraded());
    assert!(selection
        .trace
        .chosen_reason
        .contains("No clipping constraint satisfiable"));
}

#[test]
fn test_empty_sweep_defaults_to_zero() {
    let lum = vec![0.5f32; 10];
    let weights = uniform(10);
    let selection = auto_expose(
        &lum,
        &weights,
        &SweepRange::new(0.0, 1.0, 0.0),
        &AePriorities::default(),
    );

    assert_eq!(selection.chosen_ev, 0.0);
    assert_eq!(selection.trace.chosen_index, None);
    assert!(selection.trace.candidates.is_empty());
}

#[test]
fn test_stage_tags_derived_from_trace() {
    let lum = two_tone(0.02, 0.6, 50);
    let weights = uniform(100);
    let selection = auto_expose(
        &lum,
        &weights,
        &SweepRange::new(-3.0, 3.0, 0.5).with_extension(1.0),
        &AePriorities::default(),
    );
    let trace = &selection.trace;
    let tagged = trace.tagged_candidates();

    assert_eq!(tagged.len(), trace.candidates.len());
    let chosen: Vec<_> = tagged
        .iter()
        .filter(|(_, stage)| *stage == CandidateStage::Chosen)
        .collect();
    assert_eq!(chosen.len(), 1);
    assert_eq!(chosen[0].0.ev, selection.chosen_ev);

    for (i, (c, stage)) in tagged.iter().enumerate() {
        if c.extended {
            assert_eq!(*stage, CandidateStage::Initial);
        }
        if *stage == CandidateStage::Stage2Feasible {
            assert!(trace.stage1_feasible.contains(&i));
        }
    }
}

#[test]
fn test_selection_is_deterministic() {
    // Large enough to take the parallel path
    let n = 200 * 200;
    let lum: Vec<f32> = (0..n).map(|i| ((i * 7919) % 1000) as f32 / 400.0).collect();
    let weights = crate::metering::center_weighted(200, 200, 0.3);
    let range = SweepRange::new(-3.0, 3.0, 1.0 / 3.0);
    let priorities = AePriorities::default();

    let first = auto_expose(&lum, weights.as_slice(), &range, &priorities);
    let second = auto_expose(&lum, weights.as_slice(), &range, &priorities);

    assert_eq!(first, second);
    assert_eq!(first.chosen_ev.to_bits(), second.chosen_ev.to_bits());
}
