//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the Triple-Talk speech driver.
#[derive(Parser)]
#[command(name = "tt")]
#[command(about = "Drive a Triple-Talk speech synthesizer")]
#[command(version)]
pub struct Cli {
    /// JSON driver configuration file
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Device node to write to
    #[arg(long = "device", env = "TRIPLETALK_DEVICE", global = true)]
    pub device: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
