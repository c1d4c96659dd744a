//! CLI-specific error types and exit codes.

use thiserror::Error;
use tripletalk_core::CoreError;
use tripletalk_driver::SynthError;

use crate::markup::MarkupError;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Inline markup in the text could not be parsed.
    #[error("Markup error: {0}")]
    Markup(#[from] MarkupError),

    /// Driver failed to start.
    #[error("Driver error: {0}")]
    Driver(String),
}

impl CliError {
    /// Map error to an exit code (sysexits.h where one fits).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Arguments(_) | Self::Markup(_) => 2,
            Self::Config(_) => 78, // EX_CONFIG
            Self::Driver(_) => 69, // EX_UNAVAILABLE
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownVoice(_) => Self::Arguments(err.to_string()),
            _ => Self::Config(err.to_string()),
        }
    }
}

impl From<SynthError> for CliError {
    fn from(err: SynthError) -> Self {
        match err {
            SynthError::Config(core) => core.into(),
            other => Self::Driver(other.to_string()),
        }
    }
}
