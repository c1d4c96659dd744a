//! In-memory transport that records every call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use super::Transport;
use crate::error::SynthError;

/// One recorded transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Immediate(u8),
    String(Vec<u8>),
}

/// Transport that keeps every write in memory.
///
/// Used by the CLI's dry-run mode and by tests. Writes containing a
/// configured byte pattern can be made to fail, which lets tests exercise
/// the per-sequence error path.
#[derive(Debug)]
pub struct MemoryTransport {
    calls: Mutex<Vec<TransportCall>>,
    ready: AtomicBool,
    fail_on: Mutex<Option<Vec<u8>>>,
}

impl MemoryTransport {
    /// Create a transport that reports ready and accepts every write.
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            ready: AtomicBool::new(true),
            fail_on: Mutex::new(None),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Make every `write_string` whose bytes contain `needle` fail.
    pub fn fail_writes_containing(&self, needle: impl Into<Vec<u8>>) {
        *self.fail_on.lock().unwrap_or_else(PoisonError::into_inner) = Some(needle.into());
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Payloads of the `write_string` calls, in order.
    pub fn strings(&self) -> Vec<Vec<u8>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::String(bytes) => Some(bytes),
                TransportCall::Immediate(_) => None,
            })
            .collect()
    }

    /// Every byte written, immediate or buffered, concatenated.
    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for call in self.calls() {
            match call {
                TransportCall::Immediate(byte) => out.push(byte),
                TransportCall::String(bytes) => out.extend_from_slice(&bytes),
            }
        }
        out
    }

    /// Number of `write_immediate` calls carrying `byte`.
    pub fn immediate_count(&self, byte: u8) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == TransportCall::Immediate(byte))
            .count()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, call: TransportCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MemoryTransport {
    fn write_immediate(&self, byte: u8) -> Result<(), SynthError> {
        self.record(TransportCall::Immediate(byte));
        Ok(())
    }

    fn write_string(&self, bytes: &[u8]) -> Result<(), SynthError> {
        let fail_on = self.fail_on.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(needle) = fail_on.as_deref() {
            if !needle.is_empty() && bytes.windows(needle.len()).any(|w| w == needle) {
                return Err(SynthError::Write(format!(
                    "rejected {} byte write",
                    bytes.len()
                )));
            }
        }
        drop(fail_on);

        self.record(TransportCall::String(bytes.to_vec()));
        Ok(())
    }

    fn query_ready(&self) -> Result<bool, SynthError> {
        Ok(self.ready.load(Ordering::SeqCst))
    }
}
