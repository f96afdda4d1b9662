//! EV to camera-settings allocation
//!
//! Every preference runs through the same strategy: an optional primary
//! control placed first, secondary controls taking fixed shares of what the
//! primary left over, and an optional residual control absorbing whatever
//! the others could not realize. Each control is clamped to its bounds and,
//! for aperture and ISO, snapped to a standard stop; the EV it actually
//! contributes is recomputed from the realized value before the next control
//! is placed.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::quantize::{
    aperture_from_ev, ev_from_aperture, ev_from_iso, ev_from_shutter, floor_stop, iso_from_ev,
    quantize_ev, shutter_from_ev, snap_to_stops, APERTURE_STOPS, ISO_STOPS,
};
use crate::models::{AllocationPolicy, CameraSettings, Constraints, Preference};

/// Quantization changes smaller than this are not reported.
const QUANTIZATION_EPSILON: f64 = 1e-6;

/// Log-ratio slack before a bounded placement counts as moved by its bound.
const BOUND_EPSILON: f64 = 1e-9;

/// A physical bound that moved a control off its unbounded placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintHit {
    ShutterMin,
    ShutterMax,
    ApertureMin,
    ApertureMax,
    IsoMin,
    IsoMax,
}

impl ConstraintHit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintHit::ShutterMin => "shutter_min",
            ConstraintHit::ShutterMax => "shutter_max",
            ConstraintHit::ApertureMin => "aperture_min",
            ConstraintHit::ApertureMax => "aperture_max",
            ConstraintHit::IsoMin => "iso_min",
            ConstraintHit::IsoMax => "iso_max",
        }
    }

    /// True for the `*_max` tags.
    pub fn is_max(&self) -> bool {
        matches!(
            self,
            ConstraintHit::ShutterMax | ConstraintHit::ApertureMax | ConstraintHit::IsoMax
        )
    }
}

impl fmt::Display for ConstraintHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// EV contributed by each returned control, relative to the base exposure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvBreakdown {
    pub shutter_ev: f64,
    pub aperture_ev: f64,
    pub iso_ev: f64,
    pub total_ev: f64,
}

impl EvBreakdown {
    pub fn from_settings(settings: &CameraSettings) -> Option<Self> {
        if !settings.shutter_seconds.is_finite()
            || !settings.aperture.is_finite()
            || !settings.iso.is_finite()
        {
            return None;
        }
        let shutter_ev = ev_from_shutter(settings.shutter_seconds);
        let aperture_ev = ev_from_aperture(settings.aperture);
        let iso_ev = ev_from_iso(settings.iso);
        Some(Self {
            shutter_ev,
            aperture_ev,
            iso_ev,
            total_ev: shutter_ev + aperture_ev + iso_ev,
        })
    }
}

/// How a target EV was realized and where it was clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationLog {
    /// Bounds that engaged, in shutter, aperture, ISO order
    pub constraint_hits: Vec<ConstraintHit>,
    pub quantization_applied: bool,
    pub preference: Preference,
    pub target_ev: f64,
    pub quantized_ev: f64,
    /// Contributions of the returned settings; may differ from the target
    /// whenever a bound was hit or a stop was snapped
    pub ev_breakdown: Option<EvBreakdown>,
}

/// Allocator output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub settings: CameraSettings,
    pub log: AllocationLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Shutter,
    Aperture,
    Iso,
}

impl Control {
    fn index(self) -> usize {
        match self {
            Control::Shutter => 0,
            Control::Aperture => 1,
            Control::Iso => 2,
        }
    }

    fn bounds(self, c: &Constraints) -> (f64, f64) {
        match self {
            Control::Shutter => (c.shutter_min, c.shutter_max),
            Control::Aperture => (c.aperture_min, c.aperture_max),
            Control::Iso => (c.iso_min, c.iso_max),
        }
    }

    fn value_from_ev(self, ev: f64) -> f64 {
        match self {
            Control::Shutter => shutter_from_ev(ev),
            Control::Aperture => aperture_from_ev(ev),
            Control::Iso => iso_from_ev(ev),
        }
    }

    fn ev_from_value(self, value: f64) -> f64 {
        match self {
            Control::Shutter => ev_from_shutter(value),
            Control::Aperture => ev_from_aperture(value),
            Control::Iso => ev_from_iso(value),
        }
    }

    fn stops(self) -> Option<&'static [f64]> {
        match self {
            Control::Shutter => None,
            Control::Aperture => Some(&APERTURE_STOPS),
            Control::Iso => Some(&ISO_STOPS),
        }
    }

    fn hits(self) -> (ConstraintHit, ConstraintHit) {
        match self {
            Control::Shutter => (ConstraintHit::ShutterMin, ConstraintHit::ShutterMax),
            Control::Aperture => (ConstraintHit::ApertureMin, ConstraintHit::ApertureMax),
            Control::Iso => (ConstraintHit::IsoMin, ConstraintHit::IsoMax),
        }
    }
}

/// First control placed by a strategy.
#[derive(Debug, Clone, Copy)]
enum Primary {
    /// Takes the whole quantized EV
    Full(Control),
    /// Pinned at its lowest standard stop; the EV it contributes is taken
    /// out before the secondaries split the rest, so the total is conserved
    Floor(Control),
}

#[derive(Debug, Clone)]
struct Strategy {
    primary: Option<Primary>,
    /// Controls sharing what the primary left, each with its fraction
    secondaries: Vec<(Control, f64)>,
    /// Control taking the target minus every realized contribution
    residual: Option<Control>,
}

impl Strategy {
    fn for_preference(preference: Preference, policy: &AllocationPolicy) -> Self {
        match preference {
            Preference::Shutter => Strategy {
                primary: Some(Primary::Full(Control::Shutter)),
                secondaries: vec![(Control::Aperture, policy.secondary_ratio)],
                residual: Some(Control::Iso),
            },
            Preference::Aperture => Strategy {
                primary: Some(Primary::Full(Control::Aperture)),
                secondaries: vec![(Control::Shutter, policy.secondary_ratio)],
                residual: Some(Control::Iso),
            },
            Preference::Iso => Strategy {
                primary: Some(Primary::Floor(Control::Iso)),
                secondaries: vec![
                    (Control::Shutter, policy.iso_priority_shutter_ratio),
                    (Control::Aperture, 1.0 - policy.iso_priority_shutter_ratio),
                ],
                residual: None,
            },
            Preference::Balanced => Strategy {
                primary: None,
                secondaries: vec![
                    (Control::Shutter, 1.0 / 3.0),
                    (Control::Aperture, 1.0 / 3.0),
                    (Control::Iso, 1.0 / 3.0),
                ],
                residual: None,
            },
        }
    }
}

/// One control after clamping, snapping and sanitization.
#[derive(Debug, Clone, Copy)]
struct Realized {
    value: f64,
    ev: f64,
    hit: Option<ConstraintHit>,
}

/// Replace a non-finite or non-positive value with the bound minimum, then
/// clamp into the bounds.
fn sanitize_value(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        min
    } else {
        value.clamp(min, max)
    }
}

fn realize(control: Control, ev: f64, constraints: &Constraints) -> Realized {
    let (min, max) = control.bounds(constraints);
    let (min_hit, max_hit) = control.hits();
    let ideal = control.value_from_ev(ev);

    let (unbounded, placed) = match control.stops() {
        Some(stops) => (
            snap_to_stops(ideal, stops, 0.0, f64::INFINITY),
            snap_to_stops(ideal, stops, min, max),
        ),
        None => (ideal, ideal.clamp(min, max)),
    };

    // Only a bound that moved the placement counts as engaged
    let hit = if (placed / unbounded).log2().abs() > BOUND_EPSILON {
        if placed > unbounded {
            Some(min_hit)
        } else {
            Some(max_hit)
        }
    } else {
        None
    };

    let value = sanitize_value(placed, min, max);

    Realized {
        value,
        ev: control.ev_from_value(value),
        hit,
    }
}

fn realize_floor(control: Control, constraints: &Constraints) -> Realized {
    let (min, max) = control.bounds(constraints);
    let floor = match control.stops() {
        Some(stops) => floor_stop(stops, min, max),
        None => min,
    };
    let value = sanitize_value(floor, min, max);

    Realized {
        value,
        ev: control.ev_from_value(value),
        hit: None,
    }
}

/// Allocate `target_ev` with the default split policy.
pub fn allocate(target_ev: f64, constraints: &Constraints, preference: Preference) -> Allocation {
    allocate_with_policy(
        target_ev,
        constraints,
        preference,
        &AllocationPolicy::default(),
    )
}

/// Allocate `target_ev` (relative to 1/60 s, f/2.8, ISO 100) across shutter,
/// aperture and ISO.
///
/// The returned settings are always finite, positive and within bounds. A
/// bound is tagged in the log when the bounded placement differs from the
/// placement the control would get without bounds (nearest stop of the full
/// table for aperture and ISO, the raw value for shutter).
pub fn allocate_with_policy(
    target_ev: f64,
    constraints: &Constraints,
    preference: Preference,
    policy: &AllocationPolicy,
) -> Allocation {
    let constraints = constraints.sanitized();
    let quantized = quantize_ev(target_ev, constraints.quantization_step);
    let quantization_applied = (quantized - target_ev).abs() > QUANTIZATION_EPSILON;

    let strategy = Strategy::for_preference(preference, policy);
    let mut realized: [Option<Realized>; 3] = [None; 3];
    let mut placed_ev = 0.0;

    if let Some(primary) = strategy.primary {
        let (control, r) = match primary {
            Primary::Full(control) => (control, realize(control, quantized, &constraints)),
            Primary::Floor(control) => (control, realize_floor(control, &constraints)),
        };
        placed_ev += r.ev;
        realized[control.index()] = Some(r);
    }

    let remainder = quantized - placed_ev;
    for &(control, share) in &strategy.secondaries {
        let r = realize(control, remainder * share, &constraints);
        placed_ev += r.ev;
        realized[control.index()] = Some(r);
    }

    if let Some(control) = strategy.residual {
        let r = realize(control, quantized - placed_ev, &constraints);
        realized[control.index()] = Some(r);
    }

    let [shutter, aperture, iso] = [Control::Shutter, Control::Aperture, Control::Iso]
        .map(|control| realized[control.index()].unwrap_or_else(|| realize(control, 0.0, &constraints)));

    let settings = CameraSettings {
        shutter_seconds: shutter.value,
        aperture: aperture.value,
        iso: iso.value,
    };
    let constraint_hits = [shutter.hit, aperture.hit, iso.hit]
        .into_iter()
        .flatten()
        .collect();

    Allocation {
        log: AllocationLog {
            constraint_hits,
            quantization_applied,
            preference,
            target_ev,
            quantized_ev: quantized,
            ev_breakdown: EvBreakdown::from_settings(&settings),
        },
        settings,
    }
}
