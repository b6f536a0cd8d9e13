// SPDX-License-Identifier: GPL-3.0-only

use clap::{Args, Parser, Subcommand};
use posegrid::SourceKind;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "posegrid")]
#[command(about = "Top-down grid viewer for depth camera positional tracking")]
#[command(version = posegrid::constants::app_info::version())]
#[command(subcommand_required = false)]
struct Cli {
    #[command(flatten)]
    options: RunOptions,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct RunOptions {
    /// Config file (default: <config dir>/posegrid/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Pose source
    #[arg(short, long, global = true, value_enum)]
    pub source: Option<SourceKind>,

    /// Recording to play back with the replay source
    #[arg(long, global = true)]
    pub replay: Option<PathBuf>,

    /// World frame length in meters (left to right)
    #[arg(long, global = true)]
    pub length: Option<f64>,

    /// World frame width in meters (top to bottom)
    #[arg(long, global = true)]
    pub width: Option<f64>,

    /// Ask for the world frame before starting
    #[arg(long, global = true)]
    pub ask: bool,

    /// Polling interval in milliseconds
    #[arg(long, global = true, conflicts_with = "slow")]
    pub interval_ms: Option<u64>,

    /// Poll once per second instead of every 100 ms
    #[arg(long, global = true)]
    pub slow: bool,

    /// Do not poll IMU samples
    #[arg(long, global = true)]
    pub no_imu: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Live viewer in the terminal (default)
    View,

    /// Poll without a display, printing one line per sample
    Headless {
        /// Stop after this many samples (default: until Ctrl+C or end of stream)
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Write every polled sample to a JSON-lines recording
        #[arg(short, long)]
        record: Option<PathBuf>,

        /// Save the last frame as PNG on exit
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Render the empty grid with a marker at the world origin
    Grid {
        /// Output file path (default: ~/Pictures/posegrid/GRID_TIMESTAMP.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Ask for the world frame and print it
    Query,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=posegrid=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let options = cli.options;

    match cli.command {
        None | Some(Commands::View) => cli::view(&options)?,
        Some(Commands::Headless {
            ticks,
            record,
            snapshot,
        }) => cli::headless(&options, ticks, record, snapshot)?,
        Some(Commands::Grid { output }) => cli::grid(&options, output)?,
        Some(Commands::Query) => cli::query(&options)?,
    }

    Ok(())
}
