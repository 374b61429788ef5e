//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG: &str = "windcal.toml";

#[derive(Parser, Debug)]
#[command(
    name = "windcal",
    version,
    about = "Correct cup-anemometer wind speed for housing bias"
)]
pub struct Cli {
    /// Path to config TOML (defaults to ./windcal.toml when present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Calibration table CSV (strict header); overrides the config's table
    #[arg(long, value_name = "FILE")]
    pub table: Option<PathBuf>,

    /// Divisor for offsets stored in --table (10 for tenths)
    #[arg(long, value_name = "DIV", requires = "table")]
    pub offset_scale: Option<f32>,

    /// Emit JSON instead of plain text (output, logs and errors)
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG takes precedence
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Correct a single raw reading
    Correct {
        /// Raw anemometer speed
        #[arg(long, allow_negative_numbers = true)]
        speed: f32,
        /// Wind approach angle in degrees
        #[arg(long, allow_negative_numbers = true)]
        angle: f32,
    },
    /// Correct a range of raw speeds at one angle
    Sweep {
        /// Wind approach angle in degrees
        #[arg(long, allow_negative_numbers = true)]
        angle: f32,
        /// First raw speed
        #[arg(long, default_value_t = 0.0)]
        from: f32,
        /// Last raw speed (inclusive)
        #[arg(long)]
        to: f32,
        /// Raw speed increment
        #[arg(long, default_value_t = 1.0)]
        step: f32,
    },
    /// Print the active calibration table
    Table,
}
