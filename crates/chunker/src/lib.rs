//! Pure payload splitting for bounded-size transport writes.
//!
//! A transport that only accepts writes of at most N bytes needs the
//! payload cut into an ordered sequence of chunks beforehand. `split` is
//! deterministic and side-effect free: concatenating its output always
//! reproduces the input payload.

use std::collections::VecDeque;

/// Errors produced when splitting a payload.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("chunk size must be at least 1")]
    ZeroChunkSize,

    #[error("payload is empty")]
    EmptyPayload,
}

/// Splits `payload` into chunks of at most `chunk_size` bytes, in order.
///
/// The final chunk carries the remainder and may be shorter. A non-empty
/// payload always yields at least one chunk.
pub fn split(payload: &[u8], chunk_size: usize) -> Result<VecDeque<Vec<u8>>, ChunkError> {
    if chunk_size == 0 {
        return Err(ChunkError::ZeroChunkSize);
    }
    if payload.is_empty() {
        return Err(ChunkError::EmptyPayload);
    }
    Ok(payload.chunks(chunk_size).map(<[u8]>::to_vec).collect())
}

/// Number of chunks `split` would produce (ceiling division).
///
/// Returns 0 for an empty payload or a zero chunk size.
pub fn chunk_count(payload_len: usize, chunk_size: usize) -> usize {
    if chunk_size == 0 || payload_len == 0 {
        return 0;
    }
    payload_len.div_ceil(chunk_size)
}
