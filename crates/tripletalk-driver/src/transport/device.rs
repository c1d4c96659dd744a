//! Transport backed by a device node (`/dev/usb/...`, `/dev/ttyUSB0`).

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::Transport;
use crate::error::SynthError;

/// Writes straight to a device node opened for writing.
///
/// Every call is flushed before it returns so that immediate bytes (the
/// silence command in particular) are not held back behind buffered text.
#[derive(Debug)]
pub struct DeviceFileTransport {
    path: PathBuf,
    file: Mutex<File>,
}

impl DeviceFileTransport {
    /// Open the device node at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SynthError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .write(true)
            .open(&path)
            .map_err(|source| SynthError::TransportUnavailable {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), "Opened Triple-Talk device");

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_flushed(&self, bytes: &[u8]) -> Result<(), SynthError> {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(bytes)?;
        file.flush()?;
        Ok(())
    }
}

impl Transport for DeviceFileTransport {
    fn write_immediate(&self, byte: u8) -> Result<(), SynthError> {
        self.write_flushed(&[byte])
    }

    fn write_string(&self, bytes: &[u8]) -> Result<(), SynthError> {
        self.write_flushed(bytes)
    }

    fn query_ready(&self) -> Result<bool, SynthError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(!meta.permissions().readonly()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
