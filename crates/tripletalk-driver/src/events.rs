//! Notifications reported back to the host.
//!
//! The speech worker reports progress through an injected
//! [`SynthEventSink`] rather than a global bus. Sinks are called on the
//! worker thread and must not block.

use tokio::sync::mpsc;
use tripletalk_core::IndexMark;

/// Progress notification from the speech worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthEvent {
    /// All text before this index marker has been sent to the device.
    IndexReached(IndexMark),

    /// A speech sequence finished without error.
    DoneSpeaking,
}

/// Receiver of [`SynthEvent`]s.
pub trait SynthEventSink: Send + Sync {
    /// Deliver an event. Must return promptly.
    fn emit(&self, event: SynthEvent);
}

impl<F> SynthEventSink for F
where
    F: Fn(SynthEvent) + Send + Sync,
{
    fn emit(&self, event: SynthEvent) {
        self(event);
    }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl SynthEventSink for NoopEventSink {
    fn emit(&self, _event: SynthEvent) {}
}

/// Sink that forwards events into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<SynthEvent>,
}

impl ChannelEventSink {
    /// Create a sink and the receiver for its events.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SynthEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SynthEventSink for ChannelEventSink {
    fn emit(&self, event: SynthEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!(?event, "Synth event receiver dropped");
        }
    }
}
