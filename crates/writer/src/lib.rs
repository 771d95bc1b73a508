//! Paced split-write sessions over a bounded, callback-completed transport.
//!
//! A payload larger than the transport's write limit is split into chunks
//! and driven across one at a time: send a chunk, wait for its asynchronous
//! completion, report progress to the caller, wait the configured
//! inter-chunk delay, send the next. At most one chunk is ever in flight.
//!
//! The per-write completion is a oneshot channel the driver awaits before
//! dequeuing the next chunk, so the one-in-flight invariant holds without
//! locks. Cancellation is cooperative via a [`CancellationToken`] checked
//! at every suspension point; the cleanup step after the driving loop is
//! plain straight-line code in the driver task and therefore always runs —
//! the task is cancelled through the token, never aborted.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use gattflow_writer::{SplitPolicy, SplitWriter, SplitWriteRequest, SplitWriteCallback, WriteFailure};
//! # use gattflow_transport::{ChunkTransport, CompletionSender, WriteMode};
//! # struct Radio;
//! # impl ChunkTransport for Radio {
//! #     fn write_chunk(&self, _: Vec<u8>, _: WriteMode, _: CompletionSender) {}
//! # }
//! # struct Log;
//! # impl SplitWriteCallback for Log {
//! #     fn on_chunk_success(&self, _: usize, _: usize, _: &[u8], _: &[u8]) {}
//! #     fn on_chunk_failure(&self, _: &WriteFailure, _: usize, _: usize, _: Option<&[u8]>, _: &[u8], _: bool) {}
//! # }
//! # async fn demo() -> Result<(), gattflow_writer::SplitWriteError> {
//! let writer = SplitWriter::new(Arc::new(Radio));
//! let policy = SplitPolicy {
//!     inter_chunk_delay_ms: 10,
//!     ..SplitPolicy::default()
//! };
//! let request = SplitWriteRequest::new(vec![0u8; 1024], &policy)?;
//! let handle = writer.start(request, Arc::new(Log))?;
//! let outcome = handle.join().await;
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

mod callback;
mod driver;
mod policy;
mod session;

pub use callback::{SplitWriteCallback, WriteFailure};
pub use driver::SplitWriter;
pub use policy::{SplitPolicy, SplitWriteRequest};
pub use session::{SessionHandle, SessionOutcome};

/// Default max bytes per chunk: the classic 20-byte ATT payload
/// (23-byte MTU minus the 3-byte ATT header).
pub const DEFAULT_CHUNK_SIZE: usize = 20;

/// Errors surfaced synchronously, before any chunk is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitWriteError {
    #[error("payload is empty")]
    EmptyPayload,

    #[error("chunk size must be at least 1")]
    InvalidChunkSize,

    #[error("a split-write session is already active on this writer")]
    SessionBusy,
}
