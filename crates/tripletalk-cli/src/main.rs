//! CLI entry point.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tripletalk_cli::config::{self, Overrides};
use tripletalk_cli::handlers::{self, speak::SpeakArgs};
use tripletalk_cli::{Cli, CliError, Commands};

fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables before clap reads TRIPLETALK_DEVICE
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {e}"))?;

    match run(&cli) {
        Ok(code) => Ok(code),
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(exit_code(&e))
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    let loaded = config::load(cli.config.as_deref())?;
    let mut overrides = Overrides {
        device: cli.device.as_deref(),
        ..Overrides::default()
    };

    match &cli.command {
        Commands::Voices => handlers::voices::execute(),
        Commands::Check => {
            let config = overrides.apply(loaded)?;
            if !handlers::check::execute(&config) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Config => handlers::config::execute(&overrides.apply(loaded)?)?,
        Commands::Speak {
            text,
            voice,
            rate,
            pitch,
            volume,
            dry_run,
            wait_ms,
        } => {
            overrides.voice = voice.as_deref();
            overrides.rate = *rate;
            overrides.volume = *volume;
            let config = overrides.apply(loaded)?;

            let args = SpeakArgs {
                text,
                pitch: *pitch,
                dry_run: *dry_run,
                wait: Duration::from_millis(*wait_ms),
            };
            handlers::speak::execute(&config, &args)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn exit_code(err: &CliError) -> ExitCode {
    u8::try_from(err.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from)
}
