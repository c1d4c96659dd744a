//! Subcommands.

use clap::Subcommand;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List the device voices
    Voices,

    /// Check whether the device is connected and ready
    Check,

    /// Print the resolved driver configuration as JSON
    Config,

    /// Speak text, with optional inline markup
    ///
    /// Markup: [[index N]], [[break MS]], [[rate V]], [[pitch V]], [[volume V]]
    Speak {
        /// Text to speak
        text: String,

        /// Voice id (0-10)
        #[arg(long)]
        voice: Option<String>,

        /// Speaking rate (0-100)
        #[arg(long, allow_negative_numbers = true)]
        rate: Option<i32>,

        /// Pitch (0-99)
        #[arg(long, allow_negative_numbers = true)]
        pitch: Option<i32>,

        /// Volume (0-100)
        #[arg(long, allow_negative_numbers = true)]
        volume: Option<i32>,

        /// Print the bytes that would be sent instead of opening the device
        #[arg(long)]
        dry_run: bool,

        /// How long to wait for speech to be sent before shutting down
        #[arg(long, default_value_t = 10_000)]
        wait_ms: u64,
    },
}
