//! Stabkit CLI — Command-line interface for replaying camera motion logs.
//!
//! Usage:
//!   stabkit run <LOG>          Stabilize a recorded motion log
//!   stabkit info <LOG>         Show motion log statistics
//!   stabkit init-config        Write the default configuration file

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use stabkit_common::StabkitConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "stabkit",
    about = "Causal video stabilization: smooth recorded camera motion",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/stabkit/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a motion log through the stabilizer
    Run {
        /// Path to the motion log (JSONL)
        log: PathBuf,

        /// Write per-frame reports here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Frame width in pixels
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Frame height in pixels
        #[arg(long, default_value = "720")]
        height: u32,

        /// Process variance (overrides config)
        #[arg(long)]
        process_variance: Option<f64>,

        /// Measurement variance (overrides config)
        #[arg(long)]
        measurement_variance: Option<f64>,

        /// Horizontal border crop in pixels (overrides config)
        #[arg(long)]
        border: Option<u32>,
    },

    /// Show motion log statistics
    Info {
        /// Path to the motion log (JSONL)
        log: PathBuf,
    },

    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match (&cli.command, &cli.config) {
        (Commands::InitConfig { .. }, _) => StabkitConfig::default(),
        (_, Some(path)) => StabkitConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        (_, None) => StabkitConfig::load(),
    };

    // Initialize logging
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    stabkit_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Run {
            log,
            output,
            width,
            height,
            process_variance,
            measurement_variance,
            border,
        } => {
            let stabilization = &mut config.stabilization;
            if let Some(q) = process_variance {
                stabilization.process_variance = q;
            }
            if let Some(r) = measurement_variance {
                stabilization.measurement_variance = r;
            }
            if let Some(border) = border {
                stabilization.horizontal_border_crop = border;
            }
            commands::run::run(log, output, width, height, &config.stabilization)
        }
        Commands::Info { log } => commands::info::run(log),
        Commands::InitConfig { force } => commands::init_config::run(cli.config, force),
    }
}
