//! Waypointer CLI - Command-line interface
//!
//! This binary provides a command-line interface to the Waypointer library.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use commands::bearing::BearingArgs;
use commands::run::RunArgs;

/// How snapshots are printed.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable line per snapshot
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Parser)]
#[command(name = "waypointer")]
#[command(version)]
#[command(about = "Point an arrow at a destination from GPS and compass readings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the great-circle distance and initial bearing between two points
    Bearing {
        /// Start latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        from_lat: f64,

        /// Start longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        from_lon: f64,

        /// Destination latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        to_lat: f64,

        /// Destination longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        to_lon: f64,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Replay a sensor script and print every derived snapshot
    Run {
        /// Script file (reads stdin if omitted)
        #[arg(long)]
        script: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Config file (defaults to the user config directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Initial destination latitude, as typed
        #[arg(long, requires = "dest_lon", allow_hyphen_values = true)]
        dest_lat: Option<String>,

        /// Initial destination longitude, as typed
        #[arg(long, requires = "dest_lat", allow_hyphen_values = true)]
        dest_lon: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Bearing {
            from_lat,
            from_lon,
            to_lat,
            to_lon,
            format,
        } => commands::bearing::run(BearingArgs {
            from_lat,
            from_lon,
            to_lat,
            to_lon,
            format,
        }),
        Commands::Run {
            script,
            format,
            config,
            dest_lat,
            dest_lon,
        } => commands::run::run(RunArgs {
            script,
            format,
            config,
            dest_lat,
            dest_lon,
        }),
    };

    if let Err(e) = result {
        e.exit();
    }
}
