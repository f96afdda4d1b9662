//! Named camera profile types.

use serde::{Deserialize, Serialize};

use super::Constraints;

/// A camera body and lens combination saved for reuse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraProfile {
    /// Display name (e.g., "Body A + 24-70 f/2.8")
    pub name: String,

    /// Physical limits of the combination
    pub constraints: Constraints,

    /// Optional notes or description
    #[serde(default)]
    pub notes: Option<String>,
}

impl CameraProfile {
    pub fn new(name: impl Into<String>, constraints: Constraints) -> Self {
        Self {
            name: name.into(),
            constraints,
            notes: None,
        }
    }
}
