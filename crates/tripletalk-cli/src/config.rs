//! Driver configuration resolution.
//!
//! Precedence, lowest first: built-in defaults, the `--config` JSON file,
//! `TRIPLETALK_DEVICE` / `--device`, then per-command flags.

use std::fs;
use std::path::Path;

use tripletalk_core::{DriverConfig, VoiceId};

use crate::error::CliError;

/// Load the configuration file at `path`, or the defaults if there is none.
pub fn load(path: Option<&Path>) -> Result<DriverConfig, CliError> {
    let Some(path) = path else {
        return Ok(DriverConfig::default());
    };

    let raw = fs::read_to_string(path)
        .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
    let config: DriverConfig = serde_json::from_str(&raw)
        .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;

    tracing::debug!(path = %path.display(), "Loaded driver configuration");
    Ok(config)
}

/// Per-invocation overrides on top of the loaded configuration.
#[derive(Debug, Default)]
pub struct Overrides<'a> {
    pub device: Option<&'a str>,
    pub voice: Option<&'a str>,
    pub rate: Option<i32>,
    pub volume: Option<i32>,
}

impl Overrides<'_> {
    /// Apply the overrides and validate the result.
    pub fn apply(&self, mut config: DriverConfig) -> Result<DriverConfig, CliError> {
        if let Some(device) = self.device {
            config.device_path = device.to_string();
        }
        if let Some(voice) = self.voice {
            config.voice = voice.parse::<VoiceId>()?;
        }
        if let Some(rate) = self.rate {
            config.rate = rate;
        }
        if let Some(volume) = self.volume {
            config.volume = volume;
        }
        config.validate()?;
        Ok(config)
    }
}
