//! Per-session state and the caller-held session handle.

use std::collections::VecDeque;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::error;

/// Terminal result of a split-write session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every chunk was written successfully.
    Completed,
    /// The queue was drained, but some chunks failed and were skipped.
    CompletedWithFailures { failed: usize },
    /// A chunk failed and the failure policy stopped the session.
    Aborted,
    /// The session was cancelled before the queue drained.
    Cancelled,
}

/// Mutable state of one in-flight session.
///
/// Owned exclusively by the driver task; nothing else reads or mutates it.
/// `position` is an explicit monotonic counter of chunks dequeued for send,
/// so progress reports never race a concurrent reader of the queue length.
pub(crate) struct SessionState {
    pending: VecDeque<Vec<u8>>,
    total: usize,
    position: usize,
    last_sent: Option<Vec<u8>>,
    failed: usize,
}

impl SessionState {
    pub(crate) fn new(pending: VecDeque<Vec<u8>>) -> Self {
        let total = pending.len();
        Self {
            pending,
            total,
            position: 0,
            last_sent: None,
            failed: 0,
        }
    }

    /// Takes the next chunk to send, advancing the position counter and
    /// retaining a copy for a possible cancellation report.
    pub(crate) fn dequeue(&mut self) -> Option<Vec<u8>> {
        let chunk = self.pending.pop_front()?;
        self.position += 1;
        self.last_sent = Some(chunk.clone());
        Some(chunk)
    }

    /// Number of chunks handed to the transport so far. Equals
    /// `total - pending.len()` at every report site.
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn total(&self) -> usize {
        self.total
    }

    pub(crate) fn is_drained(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn last_sent(&self) -> Option<&[u8]> {
        self.last_sent.as_deref()
    }

    pub(crate) fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub(crate) fn failed(&self) -> usize {
        self.failed
    }

    /// Releases everything the session still holds.
    pub(crate) fn clear(&mut self) {
        self.pending.clear();
        self.last_sent = None;
    }
}

/// Caller's handle to a running session.
///
/// Cancellation is cooperative: [`cancel`](Self::cancel) trips the token the
/// driver checks at every suspension point. The driver task is never
/// aborted, so its cleanup step always runs.
pub struct SessionHandle {
    cancel: CancellationToken,
    task: JoinHandle<SessionOutcome>,
}

impl SessionHandle {
    pub(crate) fn new(cancel: CancellationToken, task: JoinHandle<SessionOutcome>) -> Self {
        Self { cancel, task }
    }

    /// Requests cancellation. Idempotent; takes effect at the driver's next
    /// suspension point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the session's terminal transition.
    pub async fn join(self) -> SessionOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                // Only reachable if a caller-supplied callback panicked.
                error!(error = %e, "split-write driver task failed");
                SessionOutcome::Aborted
            }
        }
    }
}
