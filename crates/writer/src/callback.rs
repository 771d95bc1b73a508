//! Caller-facing progress callbacks.

use gattflow_transport::TransportError;

/// Why a chunk was reported as failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteFailure {
    /// The transport reported the write as failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The session was cancelled while chunks remained unsent.
    #[error("split write cancelled while sending")]
    Cancelled,
}

/// Progress notifications for one split-write session.
///
/// Invocations arrive in chunk order, one per chunk, from the driver task —
/// never from the transport's own completion context. A session ends either
/// with a success for the final chunk, or with exactly one failure whose
/// `is_last_chunk` is true.
pub trait SplitWriteCallback: Send + Sync + 'static {
    /// A chunk completed successfully. `position` counts from 1 to `total`.
    fn on_chunk_success(&self, position: usize, total: usize, just_sent: &[u8], payload: &[u8]);

    /// A chunk failed, or the session was cancelled with chunks unsent.
    ///
    /// `just_sent` is the chunk the report refers to; it is `None` only if
    /// cancellation struck before the first send. `is_last_chunk` is true
    /// when no further chunk will be attempted.
    fn on_chunk_failure(
        &self,
        failure: &WriteFailure,
        position: usize,
        total: usize,
        just_sent: Option<&[u8]>,
        payload: &[u8],
        is_last_chunk: bool,
    );
}
