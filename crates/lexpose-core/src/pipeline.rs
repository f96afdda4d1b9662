//! Exposure pipeline
//!
//! One auto-exposure invocation: meter the scene, sweep and select an EV,
//! anchor it to the captured exposure when known, clamp it into what the
//! camera can reach, and allocate it to concrete settings.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::allocation::{
    allocate_with_policy, ev_range_with_policy, exposure_ev, AllocationLog, EvRange,
};
use crate::auto_exposure::{auto_expose, AeTrace};
use crate::config::EngineDefaults;
use crate::metering::{meter, weighted_luminance, MeteringStats, WeightMap};
use crate::models::{
    AePriorities, AllocationPolicy, CameraSettings, CapturedExposure, Constraints, Preference,
    SweepRange,
};
use crate::verbose_println;


/// Everything an invocation needs besides the pixels and weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExposureRequest {
    pub priorities: AePriorities,
    pub sweep: SweepRange,
    pub constraints: Constraints,
    pub preference: Preference,
    pub policy: AllocationPolicy,
    /// Exposure the scene was captured at. Without it the chosen EV is
    /// taken as the absolute target.
    pub captured: Option<CapturedExposure>,
}

impl ExposureRequest {
    /// Request built from configured defaults, without capture metadata.
    pub fn from_defaults(defaults: &EngineDefaults) -> Self {
        Self {
            priorities: defaults.priorities,
            sweep: defaults.sweep,
            constraints: defaults.constraints,
            preference: defaults.preference,
            policy: defaults.policy,
            captured: None,
        }
    }

    pub fn with_captured(mut self, captured: CapturedExposure) -> Self {
        self.captured = Some(captured);
        self
    }
}

/// Result of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureDecision {
    pub metering: MeteringStats,
    pub trace: AeTrace,
    /// EV chosen by the selector, relative to the captured scene
    pub chosen_ev: f64,
    /// Absolute target before clamping
    pub requested_ev: f64,
    /// Target handed to the allocator
    pub clamped_ev: f64,
    pub achievable_range: EvRange,
    pub settings: CameraSettings,
    pub log: AllocationLog,
}

impl ExposureDecision {
    /// True when the requested EV lay outside the achievable range.
    pub fn was_clamped(&self) -> bool {
        self.requested_ev != self.clamped_ev
    }
}

/// Run auto-exposure on an interleaved linear RGBA frame.
pub fn run_auto_exposure(
    rgba: &[f32],
    weights: &WeightMap,
    request: &ExposureRequest,
) -> Result<ExposureDecision, String> {
    let luminance = weighted_luminance(rgba, weights)?;
    run_auto_exposure_luminance(&luminance, weights, request)
}

/// Run auto-exposure on a precomputed luminance buffer.
///
/// Fails only when the buffer and weight map disagree on pixel count. A
/// degenerate weight map is replaced by the full-frame map.
pub fn run_auto_exposure_luminance(
    luminance: &[f32],
    weights: &WeightMap,
    request: &ExposureRequest,
) -> Result<ExposureDecision, String> {
    if luminance.len() != weights.len() {
        return Err(format!(
            "Luminance buffer has {} pixels but the weight map has {}",
            luminance.len(),
            weights.len()
        ));
    }

    let weights: Cow<'_, WeightMap> = if weights.is_degenerate() {
        Cow::Owned(weights.clone().or_uniform())
    } else {
        Cow::Borrowed(weights)
    };
    let weights = weights.as_slice();

    let metering = meter(luminance, weights, request.priorities.epsilon_shadow);
    let selection = auto_expose(luminance, weights, &request.sweep, &request.priorities);
    let chosen_ev = selection.chosen_ev;

    let requested_ev = match &request.captured {
        Some(captured) => exposure_ev(captured) + chosen_ev,
        None => chosen_ev,
    };

    let achievable_range =
        ev_range_with_policy(&request.constraints, request.preference, &request.policy);
    let clamped_ev = achievable_range.clamp(requested_ev);
    if clamped_ev != requested_ev {
        verbose_println!(
            "[lexpose] Target EV {:+.2} outside achievable [{:+.2}, {:+.2}]; using {:+.2}",
            requested_ev,
            achievable_range.min,
            achievable_range.max,
            clamped_ev
        );
    }

    let allocation = allocate_with_policy(
        clamped_ev,
        &request.constraints,
        request.preference,
        &request.policy,
    );

    Ok(ExposureDecision {
        metering,
        trace: selection.trace,
        chosen_ev,
        requested_ev,
        clamped_ev,
        achievable_range,
        settings: allocation.settings,
        log: allocation.log,
    })
}
