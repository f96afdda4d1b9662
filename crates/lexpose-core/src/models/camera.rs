//! Camera-side types: physical constraints, realized settings and capture metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::exposure::MIN_EV_STEP;

/// Physical bounds of the camera body and lens, plus the EV quantization step.
///
/// Supplied by the caller and treated as read-only by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    /// Fastest shutter duration in seconds
    pub shutter_min: f64,
    /// Slowest shutter duration in seconds
    pub shutter_max: f64,
    /// Widest aperture (smallest f-number)
    pub aperture_min: f64,
    /// Narrowest aperture (largest f-number)
    pub aperture_max: f64,
    pub iso_min: f64,
    pub iso_max: f64,
    /// EV quantization step in stops (1/3 for third-stop bodies)
    pub quantization_step: f64,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            shutter_min: 1.0 / 8000.0,
            shutter_max: 30.0,
            aperture_min: 2.8,
            aperture_max: 32.0,
            iso_min: 100.0,
            iso_max: 25600.0,
            quantization_step: 1.0 / 3.0,
        }
    }
}

impl Constraints {
    /// Copy with every bound positive, finite and ordered.
    pub fn sanitized(&self) -> Self {
        let mut copy = *self;
        copy.sanitize();
        copy
    }

    /// Repair bounds loaded from user files: positive, finite and ordered.
    pub(crate) fn sanitize(&mut self) {
        let defaults = Constraints::default();
        sanitize_pair(
            &mut self.shutter_min,
            &mut self.shutter_max,
            defaults.shutter_min,
            defaults.shutter_max,
        );
        sanitize_pair(
            &mut self.aperture_min,
            &mut self.aperture_max,
            defaults.aperture_min,
            defaults.aperture_max,
        );
        sanitize_pair(
            &mut self.iso_min,
            &mut self.iso_max,
            defaults.iso_min,
            defaults.iso_max,
        );
        if !self.quantization_step.is_finite() || self.quantization_step <= 0.0 {
            self.quantization_step = defaults.quantization_step;
        }
        self.quantization_step = self.quantization_step.max(MIN_EV_STEP);
    }
}

fn sanitize_pair(min: &mut f64, max: &mut f64, default_min: f64, default_max: f64) {
    if !min.is_finite() || *min <= 0.0 {
        *min = default_min;
    }
    if !max.is_finite() || *max <= 0.0 {
        *max = default_max;
    }
    if *min > *max {
        std::mem::swap(min, max);
    }
}

/// Concrete control values handed to the renderer.
///
/// Allocator output is always finite, strictly positive and within the
/// constraint bounds of each control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    pub shutter_seconds: f64,
    pub aperture: f64,
    pub iso: f64,
}

impl fmt::Display for CameraSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shutter_seconds < 1.0 {
            write!(f, "1/{:.0}s", 1.0 / self.shutter_seconds)?;
        } else {
            write!(f, "{:.1}s", self.shutter_seconds)?;
        }
        write!(f, " f/{:.1} ISO {:.0}", self.aperture, self.iso)
    }
}

/// Exposure recorded with the metered frame, used to anchor relative EVs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapturedExposure {
    pub shutter_seconds: f64,
    pub aperture: f64,
    pub iso: f64,
}

impl From<CameraSettings> for CapturedExposure {
    fn from(settings: CameraSettings) -> Self {
        Self {
            shutter_seconds: settings.shutter_seconds,
            aperture: settings.aperture,
            iso: settings.iso,
        }
    }
}

/// Which control the allocator serves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    /// Shutter takes the whole EV; aperture and ISO absorb what it cannot
    Shutter,
    /// Aperture takes the whole EV; shutter and ISO absorb the rest
    Aperture,
    /// ISO pinned at its floor; shutter and aperture share the EV
    /// remaining after the floor's own contribution, so the total EV is
    /// conserved even when the floor is above ISO 100
    Iso,
    /// Equal thirds to every control
    #[default]
    Balanced,
}

impl Preference {
    pub const ALL: [Preference; 4] = [
        Preference::Shutter,
        Preference::Aperture,
        Preference::Iso,
        Preference::Balanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preference::Shutter => "shutter",
            Preference::Aperture => "aperture",
            Preference::Iso => "iso",
            Preference::Balanced => "balanced",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Preference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shutter" | "tv" | "s" => Ok(Preference::Shutter),
            "aperture" | "av" | "a" => Ok(Preference::Aperture),
            "iso" | "sensitivity" => Ok(Preference::Iso),
            "balanced" | "auto" | "p" => Ok(Preference::Balanced),
            other => Err(format!(
                "Unknown preference '{}'. Valid: shutter, aperture, iso, balanced",
                other
            )),
        }
    }
}
