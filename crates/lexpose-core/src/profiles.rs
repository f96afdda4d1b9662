//! Camera profile management
//!
//! Load, save, and list named camera constraint sets.

use crate::models::CameraProfile;
use std::path::{Path, PathBuf};

/// Validate a profile name to prevent path traversal attacks.
/// Rejects names containing path separators, "..", or other dangerous patterns.
pub fn validate_profile_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Profile name cannot be empty".to_string());
    }

    if name.contains('/') || name.contains('\\') {
        return Err("Profile name cannot contain path separators".to_string());
    }

    if name.contains("..") {
        return Err("Profile name cannot contain '..'".to_string());
    }

    // Hidden files
    if name.starts_with('.') {
        return Err("Profile name cannot start with '.'".to_string());
    }

    if name.contains('\0') {
        return Err("Profile name cannot contain null bytes".to_string());
    }

    Ok(())
}

/// Load a camera profile from a YAML file. Bounds are sanitized on load.
pub fn load_camera_profile<P: AsRef<Path>>(path: P) -> Result<CameraProfile, String> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read profile file {}: {}", path.display(), e))?;

    let mut profile: CameraProfile = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse profile YAML: {}", e))?;
    profile.constraints.sanitize();
    Ok(profile)
}

/// Save a camera profile to a YAML file
pub fn save_camera_profile<P: AsRef<Path>>(profile: &CameraProfile, path: P) -> Result<(), String> {
    let yaml = serde_yaml::to_string(profile)
        .map_err(|e| format!("Failed to serialize profile: {}", e))?;

    std::fs::write(path.as_ref(), yaml).map_err(|e| format!("Failed to write profile file: {}", e))
}

/// Path of the profile called `name` inside `dir`.
pub fn profile_path<P: AsRef<Path>>(dir: P, name: &str) -> Result<PathBuf, String> {
    validate_profile_name(name)?;
    Ok(dir.as_ref().join(format!("{}.yml", name)))
}

/// Find `name` in `dir`, accepting either YAML extension.
pub fn find_camera_profile<P: AsRef<Path>>(dir: P, name: &str) -> Result<CameraProfile, String> {
    validate_profile_name(name)?;
    let dir = dir.as_ref();
    for ext in ["yml", "yaml"] {
        let path = dir.join(format!("{}.{}", name, ext));
        if path.is_file() {
            return load_camera_profile(path);
        }
    }
    Err(format!("No profile named '{}' in {}", name, dir.display()))
}

/// List all available camera profiles in a directory, sorted by name
pub fn list_camera_profiles<P: AsRef<Path>>(dir: P) -> Result<Vec<String>, String> {
    let dir = dir.as_ref();
    let mut profiles = Vec::new();

    let entries =
        std::fs::read_dir(dir).map_err(|e| format!("Failed to read profiles directory: {}", e))?;

    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read directory entry: {}", e))?;
        let path = entry.path();

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yml") | Some("yaml")
        );
        if is_yaml {
            if let Some(name) = path.file_stem().and_then(|n| n.to_str()) {
                profiles.push(name.to_string());
            }
        }
    }

    profiles.sort();
    Ok(profiles)
}

/// Get the default profiles directory, creating it when missing
pub fn get_profiles_dir() -> Result<PathBuf, String> {
    let profiles_dir = crate::config::user_config_dir()?.join("profiles");

    if !profiles_dir.exists() {
        std::fs::create_dir_all(&profiles_dir)
            .map_err(|e| format!("Failed to create profiles directory: {}", e))?;
    }

    Ok(profiles_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Constraints;

    #[test]
    fn test_rejects_traversal_names() {
        for bad in ["", "  ", "../etc", "a/b", "a\\b", ".hidden", "nul\0"] {
            assert!(validate_profile_name(bad).is_err(), "accepted {:?}", bad);
        }
        assert!(validate_profile_name("body-a_24-70").is_ok());
        assert!(profile_path("/tmp", "../x").is_err());
    }

    #[test]
    fn test_save_load_list() {
        let dir = tempfile::tempdir().unwrap();
        let mut profile = CameraProfile::new(
            "compact",
            Constraints {
                aperture_min: 1.8,
                aperture_max: 11.0,
                iso_max: 6400.0,
                ..Constraints::default()
            },
        );
        profile.notes = Some("fixed lens".to_string());

        let path = profile_path(dir.path(), "compact").unwrap();
        save_camera_profile(&profile, &path).unwrap();
        let alpha = CameraProfile::new("alpha", Constraints::default());
        save_camera_profile(&alpha, dir.path().join("alpha.yaml")).unwrap();
        std::fs::write(dir.path().join("readme.txt"), "not a profile").unwrap();

        assert_eq!(load_camera_profile(&path).unwrap(), profile);
        assert_eq!(
            list_camera_profiles(dir.path()).unwrap(),
            vec!["alpha".to_string(), "compact".to_string()]
        );
        assert_eq!(find_camera_profile(dir.path(), "alpha").unwrap().name, "alpha");
        assert!(find_camera_profile(dir.path(), "missing").is_err());
    }

    #[test]
    fn test_partial_profile_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.yml");
        std::fs::write(
            &path,
            "name: partial\nconstraints:\n  iso_min: 200\n  iso_max: 50\n",
        )
        .unwrap();

        let profile = load_camera_profile(&path).unwrap();
        assert_eq!(profile.notes, None);
        // Reversed bounds come back ordered
        assert_eq!(profile.constraints.iso_min, 50.0);
        assert_eq!(profile.constraints.iso_max, 200.0);
        assert_eq!(profile.constraints.shutter_max, 30.0);
    }

    #[test]
    fn test_load_errors_are_messages() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_camera_profile(dir.path().join("none.yml")).unwrap_err();
        assert!(err.contains("Failed to read profile file"));

        let path = dir.path().join("bad.yml");
        std::fs::write(&path, "name: [unterminated").unwrap();
        assert!(load_camera_profile(&path)
            .unwrap_err()
            .contains("Failed to parse"));
    }
}
