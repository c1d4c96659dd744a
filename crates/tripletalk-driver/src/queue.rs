//! Pending speech queue shared by producers and the speech worker.
//!
//! An unbounded FIFO with one extra operation a channel does not offer:
//! [`SpeechQueue::drain_pending`] removes every queued sequence without
//! handing it to the worker. Completion accounting follows the classic
//! task-queue shape: every pushed item counts as unfinished until the
//! consumer calls [`SpeechQueue::task_done`] for it or it is drained.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tripletalk_core::SpeechSequence;

/// An entry in the speech queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueItem {
    /// A sequence to translate.
    Speak(SpeechSequence),

    /// Sentinel that tells the worker to exit.
    Stop,
}

#[derive(Debug, Default)]
struct QueueState {
    items: VecDeque<QueueItem>,
    unfinished: usize,
}

/// Multi-producer, single-consumer speech queue.
#[derive(Debug, Default)]
pub struct SpeechQueue {
    state: Mutex<QueueState>,
    available: Condvar,
    idle: Condvar,
}

impl SpeechQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an item and wake the consumer.
    pub fn push(&self, item: QueueItem) {
        let mut state = self.lock();
        state.items.push_back(item);
        state.unfinished += 1;
        drop(state);
        self.available.notify_one();
    }

    /// Remove the next item, blocking until one is available.
    pub fn pop(&self) -> QueueItem {
        let mut state = self.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                return item;
            }
            state = self
                .available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Mark one popped item as fully handled.
    pub fn task_done(&self) {
        let mut state = self.lock();
        state.unfinished = state.unfinished.saturating_sub(1);
        if state.unfinished == 0 {
            self.idle.notify_all();
        }
    }

    /// Remove every queued sequence without processing it.
    ///
    /// A queued stop sentinel is kept so that a concurrent shutdown still
    /// reaches the worker. Returns the number of sequences discarded.
    pub fn drain_pending(&self) -> usize {
        let mut state = self.lock();
        let before = state.items.len();
        state.items.retain(|item| matches!(item, QueueItem::Stop));
        let drained = before - state.items.len();
        state.unfinished = state.unfinished.saturating_sub(drained);
        if state.unfinished == 0 {
            self.idle.notify_all();
        }
        drained
    }

    /// Number of items waiting to be popped.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items pushed but not yet finished (queued or in progress).
    pub fn unfinished(&self) -> usize {
        self.lock().unfinished
    }

    /// Wait until every pushed item has been finished or drained.
    ///
    /// Returns `false` if `timeout` elapsed first.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        while state.unfinished > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            state = self
                .idle
                .wait_timeout(state, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }
}
