//! Command implementations for the lexpose CLI.

mod allocate;
mod expose;
mod init;
mod profile;
mod range;

pub use allocate::cmd_allocate;
pub use expose::{cmd_expose, ExposeOptions};
pub use init::cmd_init;
pub use profile::{cmd_profile_create, cmd_profile_list, cmd_profile_show, ProfileBounds};
pub use range::cmd_range;

use std::path::PathBuf;

use lexpose_core::models::{CameraProfile, Constraints};
use lexpose_core::profiles;
use serde::Serialize;

use crate::args::OutputFormat;

/// Load a profile given either a file path or a name in the profiles directory.
pub fn resolve_profile(profile: &str) -> Result<CameraProfile, String> {
    let path = PathBuf::from(profile);
    if path.is_file() {
        return profiles::load_camera_profile(&path);
    }

    profiles::validate_profile_name(profile)?;
    let dir = profiles::get_profiles_dir()?;
    profiles::find_camera_profile(&dir, profile)
}

/// Constraints from `--profile` when given, else the configured defaults.
pub fn resolve_constraints(
    profile: Option<&str>,
    defaults: &Constraints,
) -> Result<Constraints, String> {
    match profile {
        Some(profile) => {
            let loaded = resolve_profile(profile)?;
            lexpose_core::verbose_println!("[lexpose] Using camera profile '{}'", loaded.name);
            Ok(loaded.constraints)
        }
        None => Ok(*defaults),
    }
}

/// Print `value` as JSON or YAML. Returns false for text output so the
/// caller can print its own summary.
pub fn emit_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool, String> {
    match format {
        OutputFormat::Text => Ok(false),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
            println!("{}", json);
            Ok(true)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(value)
                .map_err(|e| format!("Failed to serialize YAML: {}", e))?;
            print!("{}", yaml);
            Ok(true)
        }
    }
}

/// "+1.33 EV" style rendering.
pub(crate) fn format_ev(ev: f64) -> String {
    format!("{:+.2} EV", ev)
}
