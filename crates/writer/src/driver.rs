//! The split-write session driver.
//!
//! One driver task per session: split the payload off the async path, then
//! loop send → await completion → report → pace. The per-write oneshot is
//! the single-slot handoff that keeps exactly one chunk in flight; the
//! cancellation token is checked at every suspension point. Cleanup after
//! the loop is straight-line code in the same task — the task is only ever
//! token-cancelled, never aborted, so it runs on every exit path.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gattflow_transport::{ChunkTransport, TransportError, WriteCompletion};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::SplitWriteError;
use crate::callback::{SplitWriteCallback, WriteFailure};
use crate::policy::SplitWriteRequest;
use crate::session::{SessionHandle, SessionOutcome, SessionState};

/// How the driving loop ended; mapped to a [`SessionOutcome`] after cleanup.
enum RunExit {
    Drained,
    Aborted,
    Cancelled,
}

/// Clears the writer's busy flag when the driver task ends, panic included.
struct ActiveGuard(Arc<AtomicBool>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives split-write sessions over a [`ChunkTransport`].
///
/// One session at a time: a second [`start`](Self::start) while a session
/// is active fails with [`SplitWriteError::SessionBusy`]. The writer is
/// reusable once the previous session reaches its terminal transition.
pub struct SplitWriter<T: ChunkTransport> {
    transport: Arc<T>,
    active: Arc<AtomicBool>,
}

impl<T: ChunkTransport> SplitWriter<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a session is currently running.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Starts a session and returns immediately; chunking and transmission
    /// proceed in a spawned task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        &self,
        request: SplitWriteRequest,
        callback: Arc<dyn SplitWriteCallback>,
    ) -> Result<SessionHandle, SplitWriteError> {
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SplitWriteError::SessionBusy);
        }
        let guard = ActiveGuard(Arc::clone(&self.active));

        let transport = Arc::clone(&self.transport);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let _guard = guard;
            drive(transport, request, callback, token).await
        });
        Ok(SessionHandle::new(cancel, task))
    }
}

/// Runs one session end to end: split, drive, finalize.
async fn drive<T: ChunkTransport>(
    transport: Arc<T>,
    request: SplitWriteRequest,
    callback: Arc<dyn SplitWriteCallback>,
    cancel: CancellationToken,
) -> SessionOutcome {
    let payload = request.payload();
    let chunk_size = request.chunk_size();

    // Splitting copies the whole payload; keep it off the async path.
    let chunks = {
        let payload = Arc::clone(&payload);
        tokio::task::spawn_blocking(move || gattflow_chunker::split(&payload, chunk_size)).await
    };
    let queue = match chunks {
        Ok(Ok(queue)) => queue,
        // Request validation makes split errors unreachable.
        Ok(Err(e)) => {
            error!(error = %e, "payload split failed after request validation");
            return SessionOutcome::Aborted;
        }
        // The blocking task itself died.
        Err(e) => {
            error!(error = %e, "split task failed");
            return SessionOutcome::Aborted;
        }
    };

    let mut session = SessionState::new(queue);
    info!(
        total_chunks = session.total(),
        chunk_size,
        payload_len = payload.len(),
        "split write started"
    );

    // spawn_blocking is not interruptible: cancellation raised during the
    // split is observed here, before the first send, with the full queue
    // available for the cleanup report.
    let exit = if cancel.is_cancelled() {
        RunExit::Cancelled
    } else {
        run(&*transport, &request, &*callback, &cancel, &mut session).await
    };

    finalize(session, exit, &*callback, &payload)
}

/// The driving loop. Returns at the first terminal condition; all cleanup
/// happens in [`finalize`].
async fn run(
    transport: &dyn ChunkTransport,
    request: &SplitWriteRequest,
    callback: &dyn SplitWriteCallback,
    cancel: &CancellationToken,
    session: &mut SessionState,
) -> RunExit {
    let payload = request.payload();

    loop {
        let Some(chunk) = session.dequeue() else {
            return RunExit::Drained;
        };
        debug!(
            position = session.position(),
            total = session.total(),
            len = chunk.len(),
            "sending chunk"
        );

        let (done_tx, done_rx) = oneshot::channel();
        transport.write_chunk(chunk, request.write_mode(), done_tx);

        let completion = tokio::select! {
            biased;
            _ = cancel.cancelled() => return RunExit::Cancelled,
            done = done_rx => done.unwrap_or_else(|_| WriteCompletion {
                result: Err(TransportError::CompletionDropped),
                chunk: session.last_sent().map(<[u8]>::to_vec).unwrap_or_default(),
            }),
        };

        match completion.result {
            Ok(()) => {
                callback.on_chunk_success(
                    session.position(),
                    session.total(),
                    &completion.chunk,
                    &payload,
                );
                if session.is_drained() {
                    return RunExit::Drained;
                }
            }
            Err(err) => {
                let failure = WriteFailure::Transport(err);
                if request.continue_on_failure() {
                    let is_last = session.is_drained();
                    warn!(
                        position = session.position(),
                        error = %failure,
                        "chunk write failed, continuing"
                    );
                    session.record_failure();
                    callback.on_chunk_failure(
                        &failure,
                        session.position(),
                        session.total(),
                        Some(&completion.chunk),
                        &payload,
                        is_last,
                    );
                    if is_last {
                        return RunExit::Drained;
                    }
                } else {
                    warn!(
                        position = session.position(),
                        error = %failure,
                        "chunk write failed, aborting session"
                    );
                    callback.on_chunk_failure(
                        &failure,
                        session.position(),
                        session.total(),
                        Some(&completion.chunk),
                        &payload,
                        true,
                    );
                    return RunExit::Aborted;
                }
            }
        }

        // Pacing before the next send. A zero delay is still a suspension
        // point, so cancellation raised meanwhile is observed here.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return RunExit::Cancelled,
            _ = tokio::time::sleep(request.inter_chunk_delay()) => {}
        }
    }
}

/// Terminal cleanup; runs exactly once per session, on every exit path.
fn finalize(
    mut session: SessionState,
    exit: RunExit,
    callback: &dyn SplitWriteCallback,
    payload: &[u8],
) -> SessionOutcome {
    if matches!(exit, RunExit::Cancelled) && !session.is_drained() {
        // Chunks remained unsent: report the cancellation once. If the last
        // chunk was already in flight the queue is empty and nothing is
        // reported.
        callback.on_chunk_failure(
            &WriteFailure::Cancelled,
            session.position(),
            session.total(),
            session.last_sent(),
            payload,
            true,
        );
    }

    let outcome = match exit {
        RunExit::Drained if session.failed() == 0 => SessionOutcome::Completed,
        RunExit::Drained => SessionOutcome::CompletedWithFailures {
            failed: session.failed(),
        },
        RunExit::Aborted => SessionOutcome::Aborted,
        RunExit::Cancelled => SessionOutcome::Cancelled,
    };
    session.clear();

    info!(
        position = session.position(),
        total = session.total(),
        ?outcome,
        "split write finished"
    );
    outcome
}
