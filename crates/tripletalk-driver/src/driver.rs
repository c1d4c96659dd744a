//! The synthesizer driver facade.
//!
//! [`SynthDriver`] owns the driver state, the speech queue and the worker
//! thread. Setters, `cancel` and `pause` write to the transport on the
//! caller's thread; `speak` only enqueues.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tripletalk_core::protocol::{self, Parameter};
use tripletalk_core::{
    DriverConfig, DriverState, IndexMark, SpeechItem, SpeechSequence, VOICES, Voice, VoiceId,
};

use crate::error::SynthError;
use crate::events::SynthEventSink;
use crate::queue::{QueueItem, SpeechQueue};
use crate::translator::{SpeechSession, Translator};
use crate::transport::{self, DeviceFileTransport, Transport};
use crate::worker::WorkerHandle;

/// Short driver name reported to hosts.
pub const NAME: &str = "tripletalk";

/// Human-readable driver description.
pub const DESCRIPTION: &str = "Triple-Talk USB/USB Mini";

/// A running Triple-Talk driver session.
///
/// Dropping the driver terminates it.
pub struct SynthDriver {
    transport: Arc<dyn Transport>,
    state: Mutex<DriverState>,
    queue: Arc<SpeechQueue>,
    session: Arc<SpeechSession>,
    worker: Mutex<Option<WorkerHandle>>,
    shutdown_timeout: Duration,
}

impl SynthDriver {
    /// Start a driver on `transport`.
    ///
    /// Spawns the worker, hard-resets the device and sends a full settings
    /// pass built from `config`.
    pub fn new(
        config: &DriverConfig,
        transport: Arc<dyn Transport>,
        sink: Arc<dyn SynthEventSink>,
    ) -> Result<Self, SynthError> {
        config.validate()?;

        let queue = Arc::new(SpeechQueue::new());
        let session = Arc::new(SpeechSession::new(sink));
        let translator = Translator::new(Arc::clone(&transport), Arc::clone(&session));
        let worker = WorkerHandle::spawn(&config.worker_name, Arc::clone(&queue), translator)?;

        let driver = Self {
            transport,
            state: Mutex::new(config.initial_state()),
            queue,
            session,
            worker: Mutex::new(Some(worker)),
            shutdown_timeout: config.shutdown_timeout(),
        };

        if let Err(e) = transport::send_immediate(driver.transport.as_ref(), &protocol::RESET) {
            tracing::warn!(error = %e, "Failed to reset Triple-Talk device");
        }
        driver.apply_settings();

        tracing::info!(
            voice = %driver.voice(),
            worker = %config.worker_name,
            "Triple-Talk driver started"
        );
        Ok(driver)
    }

    /// Open the device named in `config` and start a driver on it.
    pub fn open(config: &DriverConfig, sink: Arc<dyn SynthEventSink>) -> Result<Self, SynthError> {
        let transport = DeviceFileTransport::open(&config.device_path)?;
        Self::new(config, Arc::new(transport), sink)
    }

    /// Whether a device is available at `path`.
    ///
    /// Never fails: an unopenable device is logged and reported as `false`.
    pub fn check(path: impl AsRef<Path>) -> bool {
        match DeviceFileTransport::open(path) {
            Ok(transport) => transport::is_ready(&transport),
            Err(e) => {
                tracing::warn!(error = %e, "Triple-Talk device unavailable");
                false
            }
        }
    }

    fn state(&self) -> MutexGuard<'_, DriverState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write one command, logging failures.
    fn send(&self, command: &[u8]) {
        if let Err(e) = self.transport.write_string(command) {
            tracing::warn!(error = %e, "Failed to send command to Triple-Talk");
        }
    }

    fn silence(&self) {
        if let Err(e) = self.transport.write_immediate(protocol::SILENCE) {
            tracing::warn!(error = %e, "Failed to silence Triple-Talk");
        }
    }

    /// The voices the device offers, in id order.
    pub fn available_voices(&self) -> &'static [Voice] {
        &VOICES
    }

    pub fn voice(&self) -> VoiceId {
        self.state().voice
    }

    /// Select a voice by its id string.
    ///
    /// Writes the voice command followed by every voice-dependent baseline.
    /// Unknown ids are ignored.
    pub fn set_voice(&self, id: &str) {
        let mut state = self.state();
        let Some(commands) = state.select_voice(id) else {
            tracing::debug!(voice = id, "Ignoring unknown voice");
            return;
        };
        for command in &commands {
            self.send(command);
        }
        tracing::debug!(voice = %state.voice, "Voice selected");
    }

    /// Current value of `param`, as last set.
    pub fn parameter(&self, param: Parameter) -> i32 {
        self.state().get(param)
    }

    /// Store `value` for `param` and send it to the device, clamped.
    pub fn set_parameter(&self, param: Parameter, value: i32) {
        let mut state = self.state();
        let command = state.set(param, value);
        self.send(&command);
        tracing::debug!(%param, value, "Setting changed");
    }

    pub fn rate(&self) -> i32 {
        self.parameter(Parameter::Rate)
    }

    pub fn set_rate(&self, value: i32) {
        self.set_parameter(Parameter::Rate, value);
    }

    pub fn pitch(&self) -> i32 {
        self.parameter(Parameter::Pitch)
    }

    pub fn set_pitch(&self, value: i32) {
        self.set_parameter(Parameter::Pitch, value);
    }

    pub fn inflection(&self) -> i32 {
        self.parameter(Parameter::Inflection)
    }

    pub fn set_inflection(&self, value: i32) {
        self.set_parameter(Parameter::Inflection, value);
    }

    pub fn volume(&self) -> i32 {
        self.parameter(Parameter::Volume)
    }

    pub fn set_volume(&self, value: i32) {
        self.set_parameter(Parameter::Volume, value);
    }

    pub fn articulation(&self) -> i32 {
        self.parameter(Parameter::Articulation)
    }

    pub fn set_articulation(&self, value: i32) {
        self.set_parameter(Parameter::Articulation, value);
    }

    pub fn reverb(&self) -> i32 {
        self.parameter(Parameter::Reverb)
    }

    pub fn set_reverb(&self, value: i32) {
        self.set_parameter(Parameter::Reverb, value);
    }

    pub fn formant(&self) -> i32 {
        self.parameter(Parameter::Formant)
    }

    pub fn set_formant(&self, value: i32) {
        self.set_parameter(Parameter::Formant, value);
    }

    pub fn text_delay(&self) -> i32 {
        self.parameter(Parameter::TextDelay)
    }

    pub fn set_text_delay(&self, value: i32) {
        self.set_parameter(Parameter::TextDelay, value);
    }

    pub fn tone(&self) -> i32 {
        self.parameter(Parameter::Tone)
    }

    pub fn set_tone(&self, value: i32) {
        self.set_parameter(Parameter::Tone, value);
    }

    /// Snapshot of every setting.
    pub fn settings(&self) -> DriverState {
        self.state().clone()
    }

    /// Re-send the full settings pass from the current state.
    pub fn apply_settings(&self) {
        let state = self.state();
        for command in state.full_pass() {
            self.send(&command);
        }
    }

    /// Queue a sequence for speaking. Returns immediately.
    pub fn speak(&self, sequence: impl IntoIterator<Item = SpeechItem>) {
        let sequence: SpeechSequence = sequence.into_iter().collect();
        if self.session.is_terminated() {
            tracing::debug!(items = sequence.len(), "Driver terminated, ignoring speak");
            return;
        }
        tracing::debug!(items = sequence.len(), "Queueing speech sequence");
        self.queue.push(QueueItem::Speak(sequence));
    }

    /// Discard every queued sequence and silence the device.
    ///
    /// A sequence the worker has already started is not interrupted.
    pub fn cancel(&self) {
        let drained = self.queue.drain_pending();
        self.silence();
        tracing::debug!(drained, "Speech cancelled");
    }

    /// Silence the device when `on`. Resuming is a no-op.
    pub fn pause(&self, on: bool) {
        if on {
            self.silence();
        }
    }

    /// Stop the worker and suppress further notifications.
    ///
    /// Waits at most the configured shutdown timeout for the worker. Safe to
    /// call more than once, and from inside an event sink.
    pub fn terminate(&self) {
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(worker) = worker else {
            return;
        };

        self.session.terminate();
        self.silence();
        self.queue.push(QueueItem::Stop);

        if worker.is_current() {
            // Called from an event sink; the worker exits once the sink returns.
            tracing::info!("Triple-Talk driver terminated from speech worker");
        } else if worker.join_timeout(self.shutdown_timeout) {
            tracing::info!("Triple-Talk driver terminated");
        } else {
            tracing::warn!(
                timeout_ms = self.shutdown_timeout.as_millis(),
                "Speech worker did not exit in time, continuing shutdown"
            );
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.session.is_terminated()
    }

    /// Last index marker the worker reached, if any.
    pub fn last_index(&self) -> Option<IndexMark> {
        self.session.last_index()
    }

    /// Sequences queued or in progress.
    pub fn pending(&self) -> usize {
        self.queue.unfinished()
    }

    /// Block until the queue is idle or `timeout` elapses.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        self.queue.wait_idle(timeout)
    }
}

impl Drop for SynthDriver {
    fn drop(&mut self) {
        self.terminate();
    }
}

impl std::fmt::Debug for SynthDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynthDriver")
            .field("state", &*self.state())
            .field("session", &self.session)
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}
