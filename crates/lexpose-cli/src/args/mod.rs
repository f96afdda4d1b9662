//! Argument structs shared by several CLI commands.

use clap::Args;
use lexpose_core::models::{MeteringMode, Preference};

use crate::parsers::{parse_ev, parse_metering, parse_preference};

/// Camera selection shared by expose, allocate and range.
#[derive(Args, Clone, Debug, Default)]
pub struct CameraArgs {
    /// Allocation preference: shutter, aperture, iso, or balanced
    /// (defaults to the configured preference)
    #[arg(short, long, value_name = "PREF", value_parser = parse_preference)]
    pub preference: Option<Preference>,

    /// Camera profile name (from the profiles directory) or YAML file path
    #[arg(long, value_name = "NAME|FILE")]
    pub profile: Option<String>,
}

/// Sweep overrides for the exposure search.
#[derive(Args, Clone, Debug, Default)]
pub struct SweepArgs {
    /// Lowest EV candidate
    #[arg(long, value_name = "EV", value_parser = parse_ev, allow_hyphen_values = true)]
    pub ev_min: Option<f64>,

    /// Highest EV candidate
    #[arg(long, value_name = "EV", value_parser = parse_ev, allow_hyphen_values = true)]
    pub ev_max: Option<f64>,

    /// Spacing between candidates
    #[arg(long, value_name = "EV", value_parser = parse_ev)]
    pub ev_step: Option<f64>,

    /// Extra EV past the maximum swept for display only
    #[arg(long, value_name = "EV", value_parser = parse_ev)]
    pub ev_extend: Option<f64>,

    /// Metering mode: matrix, center[:SIGMA], or spot[:X,Y[,RADIUS]]
    #[arg(short, long, value_name = "MODE", value_parser = parse_metering)]
    pub metering: Option<MeteringMode>,
}

/// Output selection.
#[derive(Args, Clone, Debug, Default)]
pub struct OutputArgs {
    /// Print machine-readable JSON
    #[arg(long, conflicts_with = "yaml")]
    pub json: bool,

    /// Print YAML
    #[arg(long)]
    pub yaml: bool,
}

/// Serialization format chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

impl OutputArgs {
    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.yaml {
            OutputFormat::Yaml
        } else {
            OutputFormat::Text
        }
    }
}
