use lexpose_core::allocation::{allocate_with_policy, ev_range_with_policy, Allocation, AllocationLog};
use lexpose_core::config::EngineDefaults;

use super::{emit_structured, format_ev, resolve_constraints};
use crate::args::{CameraArgs, OutputArgs};

/// Allocate a single target EV and print the resulting settings.
pub fn cmd_allocate(
    ev: f64,
    camera: &CameraArgs,
    output: &OutputArgs,
    defaults: &EngineDefaults,
) -> Result<(), String> {
    let constraints = resolve_constraints(camera.profile.as_deref(), &defaults.constraints)?;
    let preference = camera.preference.unwrap_or(defaults.preference);

    let allocation = allocate_with_policy(ev, &constraints, preference, &defaults.policy);
    if emit_structured(&allocation, output.format())? {
        return Ok(());
    }

    print_allocation(&allocation);

    let range = ev_range_with_policy(&constraints, preference, &defaults.policy);
    if !range.contains(ev) {
        println!(
            "Note: target lies outside the achievable range [{:+.2}, {:+.2}]",
            range.min, range.max
        );
    }
    Ok(())
}

pub(crate) fn print_allocation(allocation: &Allocation) {
    let log = &allocation.log;
    print!("Target:      {}", format_ev(log.target_ev));
    if log.quantization_applied {
        print!(" (quantized to {})", format_ev(log.quantized_ev));
    }
    println!();
    println!("Preference:  {}", log.preference);
    println!("Settings:    {}", allocation.settings);
    print_breakdown(log);
    print_hits(log);
}

fn print_breakdown(log: &AllocationLog) {
    if let Some(b) = &log.ev_breakdown {
        println!(
            "Breakdown:   shutter {:+.2}, aperture {:+.2}, iso {:+.2} (total {})",
            b.shutter_ev,
            b.aperture_ev,
            b.iso_ev,
            format_ev(b.total_ev)
        );
    }
}

fn print_hits(log: &AllocationLog) {
    if log.constraint_hits.is_empty() {
        println!("Constraint hits: none");
    } else {
        let hits: Vec<&str> = log.constraint_hits.iter().map(|h| h.as_str()).collect();
        println!("Constraint hits: {}", hits.join(", "));
    }
}
