//! Audit records produced by one auto-exposure run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Statistics of the scene re-exposed by one candidate EV.
///
/// Candidates are never modified after the sweep; their feasibility stage is
/// read back from the [`AeTrace`] that owns them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub ev: f64,
    pub highlight_clip: f64,
    pub shadow_clip: f64,
    pub median: f64,
    /// Squared distance of the median from the midtone target
    pub midtone_error: f64,
    /// Swept past the range maximum for display; never selectable
    pub extended: bool,
}

/// Highest feasibility level a candidate reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStage {
    Initial,
    Stage1Feasible,
    Stage2Feasible,
    Chosen,
}

impl fmt::Display for CandidateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CandidateStage::Initial => "initial",
            CandidateStage::Stage1Feasible => "stage1_feasible",
            CandidateStage::Stage2Feasible => "stage2_feasible",
            CandidateStage::Chosen => "chosen",
        };
        f.write_str(label)
    }
}

/// One widening of a clipping tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelaxationStep {
    /// Tolerance in force after this step
    pub tolerance: f64,
    /// EVs feasible under that tolerance, ascending
    pub feasible_evs: Vec<f64>,
}

/// Which candidate pool the final choice was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionLevel {
    /// Both clipping constraints held
    Stage2,
    /// Highlights held; no candidate met the shadow constraint
    Stage1,
    /// No constraint could be met; global minimum midtone error
    Unconstrained,
}

/// Full audit of one lexicographic auto-exposure run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AeTrace {
    /// Every swept candidate in ascending EV order
    pub candidates: Vec<Candidate>,
    /// Indices into `candidates` passing the highlight stage
    pub stage1_feasible: Vec<usize>,
    /// Indices into `candidates` passing both stages
    pub stage2_feasible: Vec<usize>,
    pub highlight_relaxation: Vec<RelaxationStep>,
    pub shadow_relaxation: Vec<RelaxationStep>,
    /// Highlight tolerance finally in force
    pub eta_highlight_used: f64,
    /// Shadow tolerance finally in force
    pub eta_shadow_used: f64,
    /// Index of the chosen candidate; `None` only for an empty sweep
    pub chosen_index: Option<usize>,
    pub chosen_ev: f64,
    pub selection_level: SelectionLevel,
    pub chosen_reason: String,
}

impl AeTrace {
    /// Feasibility stage of candidate `index`, derived from the trace sets.
    pub fn stage_of(&self, index: usize) -> CandidateStage {
        if self.chosen_index == Some(index) {
            CandidateStage::Chosen
        } else if self.stage2_feasible.contains(&index) {
            CandidateStage::Stage2Feasible
        } else if self.stage1_feasible.contains(&index) {
            CandidateStage::Stage1Feasible
        } else {
            CandidateStage::Initial
        }
    }

    /// Candidates paired with their derived stage, in sweep order.
    pub fn tagged_candidates(&self) -> Vec<(Candidate, CandidateStage)> {
        self.candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (*c, self.stage_of(i)))
            .collect()
    }

    pub fn stage1_evs(&self) -> Vec<f64> {
        self.stage1_feasible
            .iter()
            .map(|&i| self.candidates[i].ev)
            .collect()
    }

    pub fn stage2_evs(&self) -> Vec<f64> {
        self.stage2_feasible
            .iter()
            .map(|&i| self.candidates[i].ev)
            .collect()
    }

    pub fn relax_count_highlight(&self) -> usize {
        self.highlight_relaxation.len()
    }

    pub fn relax_count_shadow(&self) -> usize {
        self.shadow_relaxation.len()
    }

    pub fn chosen(&self) -> Option<&Candidate> {
        self.chosen_index.map(|i| &self.candidates[i])
    }

    /// True when a tolerance was relaxed or abandoned.
    pub fn is_degraded(&self) -> bool {
        !self.highlight_relaxation.is_empty()
            || !self.shadow_relaxation.is_empty()
            || self.selection_level != SelectionLevel::Stage2
    }
}

/// Result of the selector: the chosen relative EV and its audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AeSelection {
    pub chosen_ev: f64,
    pub trace: AeTrace,
}
