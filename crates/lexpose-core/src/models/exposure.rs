//! Exposure-decision parameters: photographer priorities, sweep range,
//! metering mode and the allocator split policy.

use serde::{Deserialize, Serialize};

/// Finest EV step accepted for sweeps and quantization, in stops.
pub const MIN_EV_STEP: f64 = 0.1;

/// Tolerances and midtone target driving the lexicographic selector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AePriorities {
    /// Maximum tolerated weight fraction of clipped highlights (0.0-1.0)
    pub eta_highlight: f64,
    /// Maximum tolerated weight fraction of crushed shadows (0.0-1.0)
    pub eta_shadow: f64,
    /// Luminance at or below which a pixel counts as crushed
    pub epsilon_shadow: f64,
    /// Desired weighted median luminance (0.18 = conventional midtone grey)
    pub midtone_target: f64,
}

impl Default for AePriorities {
    fn default() -> Self {
        Self {
            eta_highlight: 0.02,
            eta_shadow: 0.05,
            epsilon_shadow: 0.01,
            midtone_target: 0.18,
        }
    }
}

impl AePriorities {
    pub(crate) fn sanitize(&mut self) {
        let defaults = AePriorities::default();
        self.eta_highlight = finite_or(self.eta_highlight, defaults.eta_highlight).clamp(0.0, 1.0);
        self.eta_shadow = finite_or(self.eta_shadow, defaults.eta_shadow).clamp(0.0, 1.0);
        self.epsilon_shadow =
            finite_or(self.epsilon_shadow, defaults.epsilon_shadow).clamp(0.0, 0.5);
        self.midtone_target =
            finite_or(self.midtone_target, defaults.midtone_target).clamp(0.001, 1.0);
    }
}

/// Closed EV range swept by the candidate generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Extra EV past `max` swept for display only (never selectable)
    pub extend: Option<f64>,
}

impl Default for SweepRange {
    fn default() -> Self {
        Self {
            min: -6.0,
            max: 6.0,
            step: 1.0 / 3.0,
            extend: None,
        }
    }
}

impl SweepRange {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            step,
            extend: None,
        }
    }

    pub fn with_extension(mut self, extend: f64) -> Self {
        self.extend = Some(extend);
        self
    }

    pub(crate) fn sanitize(&mut self) {
        let defaults = SweepRange::default();
        if !self.step.is_finite() || self.step <= 0.0 {
            self.step = defaults.step;
        }
        self.step = self.step.max(MIN_EV_STEP);
        self.min = finite_or(self.min, defaults.min);
        self.max = finite_or(self.max, defaults.max);
        if self.min > self.max {
            std::mem::swap(&mut self.min, &mut self.max);
        }
        if let Some(extend) = self.extend {
            if !extend.is_finite() || extend <= 0.0 {
                self.extend = None;
            }
        }
    }
}

/// Spatial weighting applied when metering the scene.
///
/// Subject masks carry per-pixel data and are built directly through
/// [`crate::metering::subject_mask`] rather than configured here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MeteringMode {
    /// Whole frame, every pixel equal
    Matrix,
    /// Gaussian falloff from the frame center
    CenterWeighted {
        /// Standard deviation as a fraction of the short image side
        sigma: f64,
    },
    /// Hard-edged disc
    Spot {
        /// Normalized horizontal center (0.0-1.0)
        center_x: f64,
        /// Normalized vertical center (0.0-1.0)
        center_y: f64,
        /// Radius as a fraction of the short image side
        radius: f64,
    },
}

impl Default for MeteringMode {
    fn default() -> Self {
        MeteringMode::CenterWeighted { sigma: 0.25 }
    }
}

impl std::str::FromStr for MeteringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "matrix" | "evaluative" | "full" => Ok(MeteringMode::Matrix),
            "center" | "center-weighted" | "center_weighted" => {
                Ok(MeteringMode::CenterWeighted { sigma: 0.25 })
            }
            "spot" => Ok(MeteringMode::Spot {
                center_x: 0.5,
                center_y: 0.5,
                radius: 0.05,
            }),
            other => Err(format!(
                "Unknown metering mode '{}'. Valid: matrix, center, spot",
                other
            )),
        }
    }
}

/// Shares handed to secondary controls once the primary control is placed.
///
/// The defaults reproduce the long-standing 60/40 and 50/50 splits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationPolicy {
    /// Fraction of the primary's leftover EV given to the first secondary
    /// under shutter or aperture preference; the rest falls to ISO
    pub secondary_ratio: f64,
    /// Fraction of the EV given to shutter under ISO preference; aperture
    /// takes the complement
    pub iso_priority_shutter_ratio: f64,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self {
            secondary_ratio: 0.6,
            iso_priority_shutter_ratio: 0.5,
        }
    }
}

impl AllocationPolicy {
    pub(crate) fn sanitize(&mut self) {
        let defaults = AllocationPolicy::default();
        self.secondary_ratio =
            finite_or(self.secondary_ratio, defaults.secondary_ratio).clamp(0.0, 1.0);
        self.iso_priority_shutter_ratio = finite_or(
            self.iso_priority_shutter_ratio,
            defaults.iso_priority_shutter_ratio,
        )
        .clamp(0.0, 1.0);
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
