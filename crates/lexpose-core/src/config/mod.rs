//! Engine configuration management.
//!
//! This module provides configuration loading, global verbose flag management,
//! and the engine configuration types.

mod defaults;


pub use defaults::EngineDefaults;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Once, OnceLock};

use serde::{Deserialize, Serialize};

// Global verbose flag for controlling debug output
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set the global verbose flag. When true, debug messages will be printed.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message to stderr only if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if $crate::config::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "LEXPOSE_CONFIG";

/// Candidate config file names searched for on disk.
const CONFIG_FILENAMES: &[&str] = &["lexpose.yml", "lexpose.yaml"];

/// Loaded configuration together with its source path and any warnings.
pub struct EngineConfigHandle {
    pub config: EngineConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl EngineConfigHandle {
    fn with_config(config: EngineConfig, source: Option<PathBuf>, warnings: Vec<String>) -> Self {
        Self {
            config,
            source,
            warnings,
        }
    }
}

/// Complete configuration file structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub defaults: EngineDefaults,
}

impl EngineConfig {
    fn sanitize(mut self) -> Self {
        self.defaults.sanitize();
        self
    }
}

/// Load configuration from disk, optionally forcing a specific path.
///
/// Never fails: unreadable or malformed candidates are recorded as warnings
/// and the built-in defaults are used when nothing loads.
pub fn load_engine_config(custom_path: Option<&Path>) -> EngineConfigHandle {
    load_from_candidates(config_candidates(custom_path))
}

fn load_from_candidates(candidates: Vec<PathBuf>) -> EngineConfigHandle {
    let mut warnings = Vec::new();

    for candidate in candidates {
        if !candidate.is_file() {
            continue;
        }

        match fs::read_to_string(&candidate) {
            Ok(contents) => match serde_yaml::from_str::<EngineConfig>(&contents) {
                Ok(config) => {
                    let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                    return EngineConfigHandle::with_config(
                        config.sanitize(),
                        Some(source),
                        warnings,
                    );
                }
                Err(err) => warnings.push(format!(
                    "Failed to parse engine config {}: {}",
                    candidate.display(),
                    err
                )),
            },
            Err(err) => warnings.push(format!(
                "Failed to read engine config {}: {}",
                candidate.display(),
                err
            )),
        }
    }

    warnings.push("No engine config found; using built-in defaults.".to_string());
    EngineConfigHandle::with_config(EngineConfig::default(), None, warnings)
}

/// Config file candidates in search order.
fn config_candidates(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = custom_path {
        candidates.push(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        candidates.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(cwd.join("config").join(name));
            candidates.push(cwd.join(name));
        }
    }

    if let Some(home_dir) = dirs::home_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(home_dir.join("lexpose").join(name));
        }
    }

    candidates
}

/// Per-user directory holding `lexpose.yml` and the profiles folder.
pub fn user_config_dir() -> Result<PathBuf, String> {
    dirs::home_dir()
        .map(|home| home.join("lexpose"))
        .ok_or_else(|| "Could not determine home directory".to_string())
}

/// Write `config` as YAML, e.g. to seed a user's config file.
pub fn save_engine_config<P: AsRef<Path>>(config: &EngineConfig, path: P) -> Result<(), String> {
    let yaml =
        serde_yaml::to_string(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path.as_ref(), yaml).map_err(|e| format!("Failed to write config file: {}", e))
}

static ENGINE_CONFIG_HANDLE: OnceLock<EngineConfigHandle> = OnceLock::new();
static PRINT_CONFIG_ONCE: Once = Once::new();

/// Access the global engine configuration (loaded once per process).
///
/// The first call decides the source; pass an explicit path on that first
/// call to override the search.
pub fn engine_config_handle_with(custom_path: Option<&Path>) -> &'static EngineConfigHandle {
    ENGINE_CONFIG_HANDLE.get_or_init(|| load_engine_config(custom_path))
}

/// Access the global engine configuration using the default search path.
pub fn engine_config_handle() -> &'static EngineConfigHandle {
    engine_config_handle_with(None)
}

/// Print config source and warnings the first time it is requested (only in verbose mode).
pub fn log_config_usage() {
    PRINT_CONFIG_ONCE.call_once(|| {
        if !is_verbose() {
            return;
        }
        let handle = engine_config_handle();
        if let Some(source) = &handle.source {
            eprintln!("[lexpose] Loaded engine config from {}", source.display());
        } else {
            eprintln!("[lexpose] Using built-in engine defaults");
        }

        for warning in &handle.warnings {
            eprintln!("[lexpose] Config warning: {}", warning);
        }
    });
}
