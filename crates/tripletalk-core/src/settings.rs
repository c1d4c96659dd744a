//! Driver configuration and validation.
//!
//! Pure data: the driver crate reads it, the CLI loads it from JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::state::{DEFAULT_RATE, DEFAULT_VOLUME, DriverState};
use crate::voices::VoiceId;

/// Default device node for the Triple-Talk USB.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/usb/tripletalk0";

/// How long `terminate()` waits for the worker thread.
pub const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = 3000;

/// Name given to the speech worker thread.
pub const DEFAULT_WORKER_NAME: &str = "tt-worker";

/// Configuration for one driver session.
///
/// Missing fields in a config file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DriverConfig {
    /// Device node the transport writes to.
    pub device_path: String,

    /// Voice selected at start-up.
    pub voice: VoiceId,

    /// Rate applied at start-up (caller scale).
    pub rate: i32,

    /// Volume applied at start-up (caller scale).
    pub volume: i32,

    /// Upper bound on the worker join during `terminate()`.
    pub shutdown_timeout_ms: u64,

    /// Name of the speech worker thread.
    pub worker_name: String,
}

impl DriverConfig {
    /// Reject values that cannot be clamped into something meaningful.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.device_path.trim().is_empty() {
            return Err(CoreError::EmptyDevicePath);
        }
        if self.shutdown_timeout_ms == 0 {
            return Err(CoreError::ZeroShutdownTimeout);
        }
        if self.worker_name.is_empty() {
            return Err(CoreError::EmptyThreadName);
        }
        Ok(())
    }

    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// Driver state at start-up.
    pub fn initial_state(&self) -> DriverState {
        DriverState::new(self.voice, self.rate, self.volume)
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            device_path: DEFAULT_DEVICE_PATH.to_string(),
            voice: VoiceId::DEFAULT,
            rate: DEFAULT_RATE,
            volume: DEFAULT_VOLUME,
            shutdown_timeout_ms: DEFAULT_SHUTDOWN_TIMEOUT_MS,
            worker_name: DEFAULT_WORKER_NAME.to_string(),
        }
    }
}
