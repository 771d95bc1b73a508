//! Error types for the link layer boundary.

/// Errors reported by a transport for a single chunk write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("GATT write failed with status {0}")]
    Gatt(i32),

    #[error("write timed out")]
    Timeout,

    #[error("device not connected")]
    NotConnected,

    /// The transport dropped its completion sender without firing it.
    #[error("transport dropped the completion callback")]
    CompletionDropped,

    #[error("transport error: {0}")]
    Other(String),
}
