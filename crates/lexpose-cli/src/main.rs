use clap::{Parser, Subcommand};
use lexpose_cli::commands::{
    cmd_allocate, cmd_expose, cmd_init, cmd_profile_create, cmd_profile_list, cmd_profile_show,
    cmd_range, ExposeOptions, ProfileBounds,
};
use lexpose_cli::{
    parse_aperture, parse_ev, parse_reference, parse_scene, parse_shutter, CameraArgs,
    OutputArgs, SweepArgs,
};
use lexpose_core::models::CapturedExposure;
use lexpose_core::scenes::SceneKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lexpose")]
#[command(version, about = "Lexicographic auto-exposure engine", long_about = None)]
struct Cli {
    /// Engine config file (overrides the search path)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Meter a synthetic scene, choose an EV and allocate camera settings
    Expose {
        /// Scene: gradient, midtone, backlit, bright, dark, or spotlit
        #[arg(short, long, value_name = "SCENE", value_parser = parse_scene)]
        scene: SceneKind,

        /// Scene width in pixels
        #[arg(long, value_name = "PX", default_value = "320")]
        width: usize,

        /// Scene height in pixels
        #[arg(long, value_name = "PX", default_value = "240")]
        height: usize,

        /// Exposure the scene was captured at (shutter,aperture,iso)
        #[arg(short, long, value_name = "S,N,ISO", value_parser = parse_reference)]
        reference: Option<CapturedExposure>,

        #[command(flatten)]
        camera: CameraArgs,

        #[command(flatten)]
        sweep: SweepArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Print every candidate with its feasibility stage
        #[arg(long)]
        trace: bool,
    },

    /// Allocate a target EV to shutter, aperture and ISO
    Allocate {
        /// Target EV relative to 1/60s f/2.8 ISO 100 (e.g., 2, -1/3)
        #[arg(value_name = "EV", value_parser = parse_ev, allow_hyphen_values = true)]
        ev: f64,

        #[command(flatten)]
        camera: CameraArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show the EV range a camera reaches without hitting a bound
    Range {
        #[command(flatten)]
        camera: CameraArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage camera profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Write default config and profile files to ~/lexpose
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List available profiles
    List {
        /// Directory to list profiles from
        #[arg(short, long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Show details of a profile
    Show {
        /// Profile name or file path
        profile: String,
    },

    /// Create a new profile from the configured constraints
    Create {
        /// Profile name
        name: String,

        /// Output file path (defaults to the profiles directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Fastest shutter (e.g., 1/4000)
        #[arg(long, value_name = "S", value_parser = parse_shutter)]
        shutter_min: Option<f64>,

        /// Slowest shutter (e.g., 30)
        #[arg(long, value_name = "S", value_parser = parse_shutter)]
        shutter_max: Option<f64>,

        /// Widest aperture (e.g., f/1.8)
        #[arg(long, value_name = "N", value_parser = parse_aperture)]
        aperture_min: Option<f64>,

        /// Narrowest aperture (e.g., f/22)
        #[arg(long, value_name = "N", value_parser = parse_aperture)]
        aperture_max: Option<f64>,

        /// Lowest ISO
        #[arg(long, value_name = "ISO")]
        iso_min: Option<f64>,

        /// Highest ISO
        #[arg(long, value_name = "ISO")]
        iso_max: Option<f64>,

        /// EV quantization step (e.g., 1/3, 1/2)
        #[arg(long, value_name = "EV", value_parser = parse_ev)]
        step: Option<f64>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    lexpose_core::config::set_verbose(cli.verbose);
    let handle = lexpose_core::config::engine_config_handle_with(cli.config.as_deref());
    lexpose_core::config::log_config_usage();
    let defaults = &handle.config.defaults;

    let result = match cli.command {
        Commands::Expose {
            scene,
            width,
            height,
            reference,
            camera,
            sweep,
            output,
            trace,
        } => cmd_expose(
            &ExposeOptions {
                scene,
                width,
                height,
                reference,
                camera,
                sweep,
                output,
                trace,
            },
            defaults,
        ),

        Commands::Allocate {
            ev,
            camera,
            output,
        } => cmd_allocate(ev, &camera, &output, defaults),

        Commands::Range { camera, output } => cmd_range(&camera, &output, defaults),

        Commands::Profile { action } => match action {
            ProfileAction::List { dir } => cmd_profile_list(dir),
            ProfileAction::Show { profile } => cmd_profile_show(&profile),
            ProfileAction::Create {
                name,
                output,
                shutter_min,
                shutter_max,
                aperture_min,
                aperture_max,
                iso_min,
                iso_max,
                step,
                notes,
                force,
            } => cmd_profile_create(
                &name,
                output,
                &ProfileBounds {
                    shutter_min,
                    shutter_max,
                    aperture_min,
                    aperture_max,
                    iso_min,
                    iso_max,
                    step,
                },
                &defaults.constraints,
                notes,
                force,
            ),
        },

        Commands::Init { force } => cmd_init(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
