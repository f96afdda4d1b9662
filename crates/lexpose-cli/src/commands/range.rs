use lexpose_core::allocation::{allocate_with_policy, ev_range_with_policy, EvRange, FALLBACK_RANGE};
use lexpose_core::config::EngineDefaults;
use lexpose_core::models::{CameraSettings, Preference};
use serde::Serialize;

use super::{emit_structured, resolve_constraints};
use crate::args::{CameraArgs, OutputArgs};

#[derive(Debug, Serialize)]
struct RangeReport {
    preference: Preference,
    range: EvRange,
    /// No scanned EV allocated cleanly
    fallback: bool,
    at_min: CameraSettings,
    at_max: CameraSettings,
}

/// Print the EV interval the camera reaches without hitting a bound.
pub fn cmd_range(
    camera: &CameraArgs,
    output: &OutputArgs,
    defaults: &EngineDefaults,
) -> Result<(), String> {
    let constraints = resolve_constraints(camera.profile.as_deref(), &defaults.constraints)?;
    let preference = camera.preference.unwrap_or(defaults.preference);

    let range = ev_range_with_policy(&constraints, preference, &defaults.policy);
    let settings_at =
        |ev| allocate_with_policy(ev, &constraints, preference, &defaults.policy).settings;

    let report = RangeReport {
        preference,
        range,
        fallback: range == FALLBACK_RANGE,
        at_min: settings_at(range.min),
        at_max: settings_at(range.max),
    };
    if emit_structured(&report, output.format())? {
        return Ok(());
    }

    println!("Preference:  {}", report.preference);
    println!(
        "Achievable:  [{:+.2}, {:+.2}] EV ({:.2} stops)",
        range.min,
        range.max,
        range.width()
    );
    println!("  at min:    {}", report.at_min);
    println!("  at max:    {}", report.at_max);
    if report.fallback {
        println!("Note: no scanned EV allocated cleanly; showing the fallback range");
    }
    Ok(())
}
