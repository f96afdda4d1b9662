use std::path::PathBuf;

use lexpose_core::allocation::ev_range_from_constraints;
use lexpose_core::models::{CameraProfile, Constraints, Preference};
use lexpose_core::profiles;

use super::resolve_profile;

/// Bound overrides for a new profile; unset fields keep the base constraints.
#[derive(Debug, Clone, Default)]
pub struct ProfileBounds {
    pub shutter_min: Option<f64>,
    pub shutter_max: Option<f64>,
    pub aperture_min: Option<f64>,
    pub aperture_max: Option<f64>,
    pub iso_min: Option<f64>,
    pub iso_max: Option<f64>,
    pub step: Option<f64>,
}

impl ProfileBounds {
    pub fn apply(&self, base: &Constraints) -> Constraints {
        Constraints {
            shutter_min: self.shutter_min.unwrap_or(base.shutter_min),
            shutter_max: self.shutter_max.unwrap_or(base.shutter_max),
            aperture_min: self.aperture_min.unwrap_or(base.aperture_min),
            aperture_max: self.aperture_max.unwrap_or(base.aperture_max),
            iso_min: self.iso_min.unwrap_or(base.iso_min),
            iso_max: self.iso_max.unwrap_or(base.iso_max),
            quantization_step: self.step.unwrap_or(base.quantization_step),
        }
        .sanitized()
    }
}

/// List camera profiles in the specified or default directory.
pub fn cmd_profile_list(dir: Option<PathBuf>) -> Result<(), String> {
    let dir = match dir {
        Some(dir) => dir,
        None => profiles::get_profiles_dir()?,
    };

    println!("Listing profiles in: {}", dir.display());
    let names = profiles::list_camera_profiles(&dir)
        .map_err(|e| format!("Failed to list profiles: {}", e))?;
    if names.is_empty() {
        println!("No profiles found.");
    } else {
        for name in names {
            println!("  {}", name);
        }
    }
    Ok(())
}

/// Display the bounds of a camera profile and the range each preference reaches.
pub fn cmd_profile_show(profile: &str) -> Result<(), String> {
    let loaded = resolve_profile(profile)?;
    let c = &loaded.constraints;

    println!("Profile: {}", loaded.name);
    println!("  Shutter:  {:.6}s - {:.1}s", c.shutter_min, c.shutter_max);
    println!("  Aperture: f/{:.1} - f/{:.1}", c.aperture_min, c.aperture_max);
    println!("  ISO:      {:.0} - {:.0}", c.iso_min, c.iso_max);
    println!("  EV step:  {:.3}", c.quantization_step);

    println!("\nAchievable range:");
    for preference in Preference::ALL {
        let range = ev_range_from_constraints(c, preference);
        println!(
            "  {:<9} [{:+.2}, {:+.2}] EV",
            preference.as_str(),
            range.min,
            range.max
        );
    }

    if let Some(notes) = &loaded.notes {
        println!("\nNotes: {}", notes);
    }
    Ok(())
}

/// Create a camera profile file, starting from the configured constraints.
pub fn cmd_profile_create(
    name: &str,
    output: Option<PathBuf>,
    bounds: &ProfileBounds,
    base: &Constraints,
    notes: Option<String>,
    force: bool,
) -> Result<(), String> {
    let path = match output {
        Some(path) => path,
        None => profiles::profile_path(profiles::get_profiles_dir()?, name)?,
    };
    if path.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }

    let mut profile = CameraProfile::new(name, bounds.apply(base));
    profile.notes = notes;
    profiles::save_camera_profile(&profile, &path)?;

    println!("Profile created: {}", path.display());
    Ok(())
}
