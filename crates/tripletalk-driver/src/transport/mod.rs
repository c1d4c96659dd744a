//! Device transport: the three calls the driver needs from the hardware.
//!
//! The driver never opens or closes the physical connection itself; it is
//! handed an `Arc<dyn Transport>` and shares it between the caller thread
//! (settings, cancel, pause) and the speech worker. Each call is expected to
//! be atomic with respect to other calls. No further locking is layered on
//! top.
//!
//! ## Implementations
//!
//! | Type                  | Use                                           |
//! |-----------------------|-----------------------------------------------|
//! | [`DeviceFileTransport`] | Character device / serial node on disk      |
//! | [`MemoryTransport`]     | Records every call (tests, dry runs)        |

mod device;
mod memory;

pub use device::DeviceFileTransport;
pub use memory::{MemoryTransport, TransportCall};

use crate::error::SynthError;

/// Byte-level access to a Triple-Talk device.
pub trait Transport: Send + Sync {
    /// Write one byte, bypassing the device input buffer.
    fn write_immediate(&self, byte: u8) -> Result<(), SynthError>;

    /// Write a byte string through the device input buffer.
    fn write_string(&self, bytes: &[u8]) -> Result<(), SynthError>;

    /// Whether the device is connected and accepting data.
    fn query_ready(&self) -> Result<bool, SynthError>;
}

/// Write every byte of `bytes` with [`Transport::write_immediate`].
pub fn send_immediate(transport: &dyn Transport, bytes: &[u8]) -> Result<(), SynthError> {
    for &byte in bytes {
        transport.write_immediate(byte)?;
    }
    Ok(())
}

/// Query readiness without failing: any error counts as "not ready".
pub fn is_ready(transport: &dyn Transport) -> bool {
    match transport.query_ready() {
        Ok(true) => true,
        Ok(false) => {
            tracing::warn!("Triple-Talk device reported not ready. Is the USB device connected?");
            false
        }
        Err(e) => {
            tracing::warn!(error = %e, "Triple-Talk readiness query failed");
            false
        }
    }
}
