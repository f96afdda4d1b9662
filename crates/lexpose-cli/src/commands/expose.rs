use lexpose_core::auto_exposure::AeTrace;
use lexpose_core::config::EngineDefaults;
use lexpose_core::metering::generate_weight_map;
use lexpose_core::models::{CapturedExposure, SweepRange};
use lexpose_core::pipeline::{run_auto_exposure, ExposureDecision, ExposureRequest};
use lexpose_core::scenes::{generate_scene, SceneKind};

use super::allocate::print_allocation;
use super::{emit_structured, format_ev, resolve_constraints};
use crate::args::{CameraArgs, OutputArgs, SweepArgs};

/// Everything the expose command takes from the command line.
#[derive(Debug, Clone)]
pub struct ExposeOptions {
    pub scene: SceneKind,
    pub width: usize,
    pub height: usize,
    pub reference: Option<CapturedExposure>,
    pub camera: CameraArgs,
    pub sweep: SweepArgs,
    pub output: OutputArgs,
    /// Print every candidate with its stage
    pub trace: bool,
}

/// Build the engine request from configured defaults and overrides.
pub fn build_request(
    options: &ExposeOptions,
    defaults: &EngineDefaults,
) -> Result<ExposureRequest, String> {
    let mut request = ExposureRequest::from_defaults(defaults);
    request.constraints =
        resolve_constraints(options.camera.profile.as_deref(), &defaults.constraints)?;
    if let Some(preference) = options.camera.preference {
        request.preference = preference;
    }
    request.sweep = sweep_with_overrides(&defaults.sweep, &options.sweep)?;
    request.captured = options.reference;
    Ok(request)
}

fn sweep_with_overrides(base: &SweepRange, args: &SweepArgs) -> Result<SweepRange, String> {
    let mut sweep = *base;
    if let Some(min) = args.ev_min {
        sweep.min = min;
    }
    if let Some(max) = args.ev_max {
        sweep.max = max;
    }
    if let Some(step) = args.ev_step {
        sweep.step = step;
    }
    if args.ev_extend.is_some() {
        sweep.extend = args.ev_extend;
    }

    if sweep.step <= 0.0 {
        return Err(format!("EV step must be positive, got {}", sweep.step));
    }
    if sweep.min > sweep.max {
        return Err(format!(
            "EV minimum {} exceeds maximum {}",
            sweep.min, sweep.max
        ));
    }
    Ok(sweep)
}

/// Meter a synthetic scene, pick an EV and allocate it.
pub fn cmd_expose(options: &ExposeOptions, defaults: &EngineDefaults) -> Result<(), String> {
    if options.width == 0 || options.height == 0 {
        return Err("Scene width and height must be positive".to_string());
    }

    let request = build_request(options, defaults)?;
    let mode = options.sweep.metering.unwrap_or(defaults.metering);

    lexpose_core::verbose_println!(
        "[lexpose] Scene {} {}x{}, metering {:?}",
        options.scene,
        options.width,
        options.height,
        mode
    );

    let scene = generate_scene(options.scene, options.width, options.height);
    let weights = generate_weight_map(&mode, scene.width, scene.height);
    let decision = run_auto_exposure(&scene.rgba, &weights, &request)?;

    if emit_structured(&decision, options.output.format())? {
        return Ok(());
    }

    print_decision(&decision);
    if options.trace {
        println!();
        print_trace(&decision.trace);
    }
    Ok(())
}

fn print_decision(decision: &ExposureDecision) {
    let m = &decision.metering;
    println!(
        "Metering:    median {:.4}, mean {:.4}, p05 {:.4}, p95 {:.4}, range {:.1} stops",
        m.median, m.mean, m.p05, m.p95, m.dynamic_range_stops
    );
    println!(
        "Clipping:    highlights {:.1}%, shadows {:.1}%",
        m.highlight_clip * 100.0,
        m.shadow_clip * 100.0
    );

    let trace = &decision.trace;
    println!("Chosen:      {}", format_ev(decision.chosen_ev));
    println!("Reason:      {}", trace.chosen_reason);
    if trace.is_degraded() {
        println!(
            "Relaxed:     highlight x{} (to {:.2}), shadow x{} (to {:.2})",
            trace.relax_count_highlight(),
            trace.eta_highlight_used,
            trace.relax_count_shadow(),
            trace.eta_shadow_used
        );
    }

    if decision.was_clamped() {
        println!(
            "Clamped:     {} -> {} (achievable [{:+.2}, {:+.2}])",
            format_ev(decision.requested_ev),
            format_ev(decision.clamped_ev),
            decision.achievable_range.min,
            decision.achievable_range.max
        );
    }
    println!();

    print_allocation(&lexpose_core::allocation::Allocation {
        settings: decision.settings,
        log: decision.log.clone(),
    });
}

fn print_trace(trace: &AeTrace) {
    println!(
        "{:>8}  {:>9}  {:>9}  {:>8}  {:>10}  stage",
        "EV", "highlight", "shadow", "median", "error"
    );
    for (candidate, stage) in trace.tagged_candidates() {
        let marker = if candidate.extended { " (extended)" } else { "" };
        println!(
            "{:>+8.2}  {:>8.2}%  {:>8.2}%  {:>8.4}  {:>10.6}  {}{}",
            candidate.ev,
            candidate.highlight_clip * 100.0,
            candidate.shadow_clip * 100.0,
            candidate.median,
            candidate.midtone_error,
            stage,
            marker
        );
    }
}
