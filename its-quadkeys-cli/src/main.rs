//! ITS Quadkeys CLI - Command-line interface
//!
//! Encode positions, inspect paths and regions, and replay a station's
//! movement to see which MQTT filters it would subscribe to.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::roi::Fix;
use commands::{emit, path, roi, zone};
use error::CliError;

#[derive(Parser)]
#[command(name = "its-quadkeys")]
#[command(version, about = "Quadtree paths and zones for ITS MQTT topics", long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a position into a quadkey path
    Encode {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Path depth (1-32)
        #[arg(long, default_value = "18")]
        depth: u8,
    },

    /// List the eight neighbours of a path
    Neighbours {
        /// Path digits, e.g. 1203
        path: String,
    },

    /// Split a path into all its descendants at a deeper level
    Split {
        /// Path digits, e.g. 1203
        path: String,

        /// Absolute target depth
        #[arg(long, conflicts_with = "by", required_unless_present = "by")]
        depth: Option<u8>,

        /// Number of extra levels
        #[arg(long)]
        by: Option<u8>,
    },

    /// Reduce a set of paths to the smallest set covering the same area
    Optimise {
        /// Path digits
        #[arg(required = true)]
        paths: Vec<String>,

        /// Also print the surrounding tiles at this depth
        #[arg(long)]
        neighbours: Option<u8>,
    },

    /// Replay position fixes and print the subscription changes
    Roi {
        /// Position fix as lat,lon[,speed m/s]; repeat for a track
        #[arg(long = "fix", required = true, allow_hyphen_values = true)]
        fixes: Vec<Fix>,

        /// Configuration file (default: ~/.its-quadkeys/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    its_quadkeys::logging::init_logging(&cli.log_level)
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    let json = cli.json;
    match cli.command {
        Commands::Encode { lat, lon, depth } => {
            let report = path::encode(lat, lon, depth)?;
            emit(&report, json, path::render_encode)
        }
        Commands::Neighbours { path: digits } => {
            let entries = path::neighbours(&digits)?;
            emit(&entries, json, |e| path::render_neighbours(e))
        }
        Commands::Split {
            path: digits,
            depth,
            by,
        } => {
            let region = path::split(&digits, depth, by)?;
            emit(&region, json, path::render_region)
        }
        Commands::Optimise { paths, neighbours } => {
            let report = zone::optimise(&paths, neighbours)?;
            emit(&report, json, zone::render_optimise)
        }
        Commands::Roi { fixes, config } => {
            let config = roi::load_config(config.as_deref())?;
            let reports = roi::replay(config, &fixes)?;
            emit(&reports, json, |r| roi::render_reports(r))
        }
    }
}
