use std::path::Path;

use lexpose_core::config::{save_engine_config, user_config_dir, EngineConfig};
use lexpose_core::models::CameraProfile;
use lexpose_core::profiles;

/// Initialize the user configuration directory.
///
/// Writes the built-in defaults to `~/lexpose/lexpose.yml` and a `default`
/// camera profile under `~/lexpose/profiles/`. Safe to run multiple times:
/// existing files are kept unless `force` is true.
pub fn cmd_init(force: bool) -> Result<(), String> {
    let root = user_config_dir()?;
    println!("Initializing lexpose configuration in: {}", root.display());
    init_into(&root, force)
}

fn init_into(root: &Path, force: bool) -> Result<(), String> {
    let profiles_dir = root.join("profiles");
    std::fs::create_dir_all(&profiles_dir)
        .map_err(|e| format!("Failed to create profiles directory: {}", e))?;

    let config = EngineConfig::default();
    let config_path = root.join("lexpose.yml");
    if !config_path.exists() || force {
        save_engine_config(&config, &config_path)?;
        println!("  Wrote: lexpose.yml");
    } else {
        println!("  Skipped: lexpose.yml (already exists, use --force to overwrite)");
    }

    let profile_path = profiles::profile_path(&profiles_dir, "default")?;
    if !profile_path.exists() || force {
        let mut profile = CameraProfile::new("default", config.defaults.constraints);
        profile.notes = Some("Full-frame body with an f/2.8 zoom".to_string());
        profiles::save_camera_profile(&profile, &profile_path)?;
        println!("  Wrote: profiles/default.yml");
    } else {
        println!("  Skipped: profiles/default.yml (already exists)");
    }

    Ok(())
}
