//! Dedicated speech worker thread.
//!
//! One OS thread per driver drains the [`SpeechQueue`] and hands each
//! sequence to the [`Translator`]. A panicking sequence is logged and
//! dropped; the loop keeps going until it pops the stop sentinel.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tripletalk_core::SpeechItem;

use crate::error::SynthError;
use crate::queue::{QueueItem, SpeechQueue};
use crate::translator::Translator;

/// Handle to the running speech worker.
#[derive(Debug)]
pub struct WorkerHandle {
    thread: thread::JoinHandle<()>,
    // Disconnects when the worker thread finishes, however it finishes.
    exited: mpsc::Receiver<()>,
}

impl WorkerHandle {
    /// Start the worker on a new thread named `name`.
    pub fn spawn(
        name: &str,
        queue: Arc<SpeechQueue>,
        translator: Translator,
    ) -> Result<Self, SynthError> {
        let (exited_tx, exited) = mpsc::channel::<()>();

        let thread = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let _exited_tx = exited_tx;
                run(&queue, &translator);
            })
            .map_err(SynthError::WorkerSpawn)?;

        Ok(Self { thread, exited })
    }

    /// Whether the caller is running on the worker thread.
    pub fn is_current(&self) -> bool {
        self.thread.thread().id() == thread::current().id()
    }

    /// Wait up to `timeout` for the worker to exit.
    ///
    /// Returns `false` if it is still running; the thread is then detached.
    pub fn join_timeout(self, timeout: Duration) -> bool {
        match self.exited.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if self.thread.join().is_err() {
                    tracing::warn!("Speech worker panicked during shutdown");
                }
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
        }
    }
}

/// Worker loop body.
fn run(queue: &SpeechQueue, translator: &Translator) {
    tracing::debug!("Speech worker started");

    loop {
        match queue.pop() {
            QueueItem::Stop => {
                queue.task_done();
                break;
            }
            QueueItem::Speak(sequence) => {
                if translator.session().is_terminated() {
                    tracing::debug!(items = sequence.len(), "Session terminated, skipping sequence");
                } else {
                    process(translator, &sequence);
                }
                queue.task_done();
            }
        }
    }

    tracing::debug!("Speech worker shutting down");
}

/// Translate one sequence, containing a panic to that sequence.
fn process(translator: &Translator, sequence: &[SpeechItem]) {
    match panic::catch_unwind(AssertUnwindSafe(|| translator.translate(sequence))) {
        Ok(()) => tracing::debug!(items = sequence.len(), "Speech sequence sent"),
        Err(payload) => {
            let e = SynthError::TranslationPanicked(panic_message(&*payload));
            tracing::error!(
                error = %e,
                items = sequence.len(),
                "Error processing speech sequence, dropping it"
            );
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
