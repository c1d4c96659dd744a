//! Core error types.

use thiserror::Error;

/// Errors raised by the pure domain layer.
///
/// Runtime input from the host (an unknown voice on `set_voice`, an
/// out-of-range rate) is never reported through this type: it is ignored or
/// clamped. These variants cover parsing and configuration, where the caller
/// does have a way to recover.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Voice identifier is not one of the enumerated voices.
    #[error("Unknown voice id: {0:?}")]
    UnknownVoice(String),

    /// Device path in the configuration is empty.
    #[error("Device path cannot be empty")]
    EmptyDevicePath,

    /// Shutdown timeout must be non-zero.
    #[error("Shutdown timeout must be greater than zero")]
    ZeroShutdownTimeout,

    /// Worker thread name cannot be empty.
    #[error("Worker thread name cannot be empty")]
    EmptyThreadName,
}
