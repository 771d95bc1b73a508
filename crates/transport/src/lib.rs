//! Interface boundary to the bounded-write link layer.
//!
//! The link layer accepts one bounded-size write at a time and reports its
//! outcome asynchronously, exactly once per write. That contract is the
//! whole surface: implementations issue the write however they like (GATT
//! characteristic, serial frame, loopback in tests) and fire the completion
//! sender when the link acknowledges or rejects it.

use tokio::sync::oneshot;

pub mod error;

pub use error::TransportError;

/// Transport-level write kind, forwarded unchanged to the link layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WriteMode {
    /// Acknowledged write (the link confirms each chunk).
    WithResponse,
    /// Unacknowledged write (fire-and-forget at the link level; the
    /// completion still reports local submission outcome).
    WithoutResponse,
    /// Signed write.
    Signed,
}

impl Default for WriteMode {
    fn default() -> Self {
        Self::WithResponse
    }
}

/// Outcome of a single chunk write, delivered exactly once per write.
///
/// The just-sent chunk is echoed back so the consumer can report it
/// without retaining its own copy.
#[derive(Debug)]
pub struct WriteCompletion {
    pub result: Result<(), TransportError>,
    pub chunk: Vec<u8>,
}

/// Exactly-once completion callback for one write.
///
/// Sending consumes the sender, so a conforming transport cannot complete
/// a write twice. Dropping it without sending is a contract violation that
/// the consumer surfaces as [`TransportError::CompletionDropped`].
pub type CompletionSender = oneshot::Sender<WriteCompletion>;

/// A link layer that accepts one bounded-size write at a time.
pub trait ChunkTransport: Send + Sync + 'static {
    /// Issues a single bounded write.
    ///
    /// Must not block; the outcome is reported by firing `done` exactly
    /// once, from any execution context.
    fn write_chunk(&self, chunk: Vec<u8>, mode: WriteMode, done: CompletionSender);
}
