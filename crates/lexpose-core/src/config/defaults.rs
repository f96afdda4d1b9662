//! Default engine parameter values and their sanitization.

use serde::{Deserialize, Serialize};

use crate::models::{
    AePriorities, AllocationPolicy, Constraints, MeteringMode, Preference, SweepRange,
};

/// Parameters used when a caller does not supply its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineDefaults {
    /// Clipping tolerances and midtone target for the selector
    pub priorities: AePriorities,
    /// Camera bounds used when no profile is given
    pub constraints: Constraints,
    /// Control served first by the allocator
    pub preference: Preference,
    /// EV range swept by the candidate generator
    pub sweep: SweepRange,
    /// Spatial weighting of the metered frame
    pub metering: MeteringMode,
    /// Split ratios for secondary controls
    pub policy: AllocationPolicy,
}

impl EngineDefaults {
    /// Clamp values loaded from user files into their valid ranges.
    pub(crate) fn sanitize(&mut self) {
        self.priorities.sanitize();
        self.constraints.sanitize();
        self.sweep.sanitize();
        self.policy.sanitize();
        self.metering = sanitize_metering(self.metering);
    }
}

fn sanitize_metering(mode: MeteringMode) -> MeteringMode {
    match mode {
        MeteringMode::Matrix => MeteringMode::Matrix,
        MeteringMode::CenterWeighted { sigma } => {
            if sigma.is_finite() && sigma > 0.0 {
                MeteringMode::CenterWeighted {
                    sigma: sigma.min(10.0),
                }
            } else {
                MeteringMode::default()
            }
        }
        MeteringMode::Spot {
            center_x,
            center_y,
            radius,
        } => MeteringMode::Spot {
            center_x: unit_or_half(center_x),
            center_y: unit_or_half(center_y),
            radius: if radius.is_finite() {
                radius.clamp(0.0, 1.0)
            } else {
                0.05
            },
        },
    }
}

fn unit_or_half(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.5
    }
}
