//! Speech sequence → device byte stream.
//!
//! Text and rate/pitch/volume overrides accumulate in a buffer. Index
//! markers and breaks are flush points: the buffer is written with a
//! trailing carriage return (which makes the device speak it) before the
//! marker is reported or the pause is sent. An empty buffer is never
//! flushed.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tripletalk_core::protocol::{self, Parameter};
use tripletalk_core::{IndexMark, SpeechItem};

use crate::events::{SynthEvent, SynthEventSink};
use crate::transport::Transport;

thread_local! {
    // Set while this thread is inside `SynthEventSink::emit`.
    static IN_SINK: Cell<bool> = const { Cell::new(false) };
}

/// Per-driver notification state shared by the driver and its worker.
///
/// Emission is serialised by `emitting`, and the termination flag is
/// re-checked under it. Once [`SpeechSession::terminate`] returns no further
/// event can reach the sink. The flag itself is an atomic, so sinks may call
/// back into the driver.
pub struct SpeechSession {
    terminated: AtomicBool,
    emitting: Mutex<()>,
    last_index: Mutex<Option<IndexMark>>,
    sink: Arc<dyn SynthEventSink>,
}

impl SpeechSession {
    pub fn new(sink: Arc<dyn SynthEventSink>) -> Self {
        Self {
            terminated: AtomicBool::new(false),
            emitting: Mutex::new(()),
            last_index: Mutex::new(None),
            sink,
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Suppress all further notifications. Returns `false` if the session
    /// was already terminated.
    ///
    /// Waits for an in-flight notification to finish, unless called from
    /// inside the sink itself.
    pub fn terminate(&self) -> bool {
        let newly = !self.terminated.swap(true, Ordering::SeqCst);
        if !Self::in_sink() {
            drop(self.emitting.lock().unwrap_or_else(PoisonError::into_inner));
        }
        newly
    }

    /// Whether the current thread is running a sink callback.
    pub fn in_sink() -> bool {
        IN_SINK.with(Cell::get)
    }

    /// Last index marker reached, if any.
    pub fn last_index(&self) -> Option<IndexMark> {
        *self
            .last_index
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn reach_index(&self, mark: IndexMark) {
        *self
            .last_index
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(mark);
        self.notify(SynthEvent::IndexReached(mark));
    }

    fn notify(&self, event: SynthEvent) {
        let _emitting = self.emitting.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_terminated() {
            tracing::trace!(?event, "Session terminated, dropping notification");
            return;
        }

        IN_SINK.with(|flag| flag.set(true));
        let _reset = ResetInSink;
        self.sink.emit(event);
    }
}

/// Clears the in-sink marker, also when the sink panics.
struct ResetInSink;

impl Drop for ResetInSink {
    fn drop(&mut self) {
        IN_SINK.with(|flag| flag.set(false));
    }
}

impl std::fmt::Debug for SpeechSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechSession")
            .field("terminated", &self.is_terminated())
            .field("last_index", &self.last_index())
            .finish_non_exhaustive()
    }
}

/// Translates one speech sequence at a time onto a transport.
pub struct Translator {
    transport: Arc<dyn Transport>,
    session: Arc<SpeechSession>,
}

impl Translator {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SpeechSession>) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &SpeechSession {
        &self.session
    }

    /// Send `sequence` to the device, in order.
    ///
    /// Writes are fire-and-forget: a failed write is logged and the rest of
    /// the sequence still goes out.
    pub fn translate(&self, sequence: &[SpeechItem]) {
        let mut buf = Vec::new();

        for item in sequence {
            match item {
                SpeechItem::Text(text) => protocol::push_text(&mut buf, text),
                SpeechItem::Index(mark) => {
                    self.flush(&mut buf);
                    self.session.reach_index(*mark);
                }
                SpeechItem::Rate(value) => protocol::encode_into(&mut buf, Parameter::Rate, *value),
                SpeechItem::Pitch(value) => {
                    protocol::encode_into(&mut buf, Parameter::Pitch, *value);
                }
                SpeechItem::Volume(value) => {
                    protocol::encode_into(&mut buf, Parameter::Volume, *value);
                }
                SpeechItem::Break(millis) => {
                    self.flush(&mut buf);
                    self.write(protocol::pause_for(*millis));
                }
            }
        }

        self.flush(&mut buf);
        self.session.notify(SynthEvent::DoneSpeaking);
    }

    /// Write the buffer plus terminator in one call and clear it.
    fn flush(&self, buf: &mut Vec<u8>) {
        if buf.is_empty() {
            return;
        }
        buf.push(protocol::FLUSH);
        self.write(buf);
        buf.clear();
    }

    fn write(&self, bytes: &[u8]) {
        if let Err(e) = self.transport.write_string(bytes) {
            tracing::warn!(error = %e, len = bytes.len(), "Device write failed, continuing");
        }
    }
}
