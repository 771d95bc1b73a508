//! Session configuration and the immutable per-session request.

use std::sync::Arc;
use std::time::Duration;

use gattflow_transport::WriteMode;
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_CHUNK_SIZE, SplitWriteError};

/// How a payload is split and paced across the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitPolicy {
    /// Max bytes per chunk. Must be at least 1.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Keep sending remaining chunks after a chunk write fails.
    #[serde(default)]
    pub continue_on_failure: bool,
    /// Delay between consecutive chunk sends, in milliseconds. Zero means
    /// no delay and is a valid configured value.
    #[serde(default)]
    pub inter_chunk_delay_ms: u64,
    /// Transport-level write kind, forwarded unchanged.
    #[serde(default)]
    pub write_mode: WriteMode,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for SplitPolicy {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            continue_on_failure: false,
            inter_chunk_delay_ms: 0,
            write_mode: WriteMode::default(),
        }
    }
}

/// Immutable input for one split-write session.
///
/// Validation happens here, synchronously, before any session state exists:
/// a request that constructs is a request the driver can run.
#[derive(Debug, Clone)]
pub struct SplitWriteRequest {
    payload: Arc<[u8]>,
    chunk_size: usize,
    continue_on_failure: bool,
    inter_chunk_delay: Duration,
    write_mode: WriteMode,
}

impl SplitWriteRequest {
    /// Builds a request from a payload and a policy.
    ///
    /// Fails with [`SplitWriteError::EmptyPayload`] or
    /// [`SplitWriteError::InvalidChunkSize`] without invoking any callback.
    pub fn new(payload: impl Into<Vec<u8>>, policy: &SplitPolicy) -> Result<Self, SplitWriteError> {
        let payload: Vec<u8> = payload.into();
        if payload.is_empty() {
            return Err(SplitWriteError::EmptyPayload);
        }
        if policy.chunk_size == 0 {
            return Err(SplitWriteError::InvalidChunkSize);
        }
        Ok(Self {
            payload: payload.into(),
            chunk_size: policy.chunk_size,
            continue_on_failure: policy.continue_on_failure,
            inter_chunk_delay: Duration::from_millis(policy.inter_chunk_delay_ms),
            write_mode: policy.write_mode,
        })
    }

    /// The full payload this session transmits.
    pub fn payload(&self) -> Arc<[u8]> {
        Arc::clone(&self.payload)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn continue_on_failure(&self) -> bool {
        self.continue_on_failure
    }

    pub fn inter_chunk_delay(&self) -> Duration {
        self.inter_chunk_delay
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }
}
