//! Driver error types.

use std::path::PathBuf;

use tripletalk_core::CoreError;

/// Errors that can occur while talking to the device.
///
/// None of these reach the host through `speak`, `cancel` or the setters:
/// they are logged where they happen. They surface from construction and
/// from the transport itself.
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    /// Device node could not be opened.
    #[error("Triple-Talk device not available at {path}: {source}")]
    TransportUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Write to the device failed.
    #[error("Device write failed: {0}")]
    Write(String),

    /// Invalid driver configuration.
    #[error("Invalid configuration: {0}")]
    Config(#[from] CoreError),

    /// Speech worker thread could not be started.
    #[error("Failed to spawn speech worker: {0}")]
    WorkerSpawn(std::io::Error),

    /// Translating a sequence panicked.
    #[error("Speech sequence translation panicked: {0}")]
    TranslationPanicked(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
