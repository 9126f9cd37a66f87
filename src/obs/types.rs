//! OBS-facing value types and error definitions.

use serde::Serialize;
use thiserror::Error;

/// Snapshot of the stream output, as seen by the health monitor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StreamStatus {
    /// Whether the stream output is live.
    pub active: bool,
    /// Current output throughput in Kbps.
    pub bitrate_kbps: f64,
}

/// Version information returned by the liveness ping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObsVersion {
    pub obs_version: String,
    pub websocket_version: String,
    pub rpc_version: u32,
}

/// Errors that can occur while talking to OBS.
#[derive(Debug, Error)]
pub enum ObsError {
    /// Socket could not be opened, or was lost mid-session.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Handshake rejected the credentials.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Call did not complete within the configured timeout.
    #[error("OBS request timed out after {0} seconds")]
    Timeout(u64),

    /// OBS answered the request with a failure status.
    #[error("{request_type} failed (code {code}): {comment}")]
    Request {
        request_type: String,
        code: u16,
        comment: String,
    },

    /// Message did not match the obs-websocket protocol.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl ObsError {
    /// True when the session to OBS is unusable and must be re-established.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ObsError::Connection(_) | ObsError::Auth(_))
    }
}

/// Result type for OBS operations.
pub type ObsResult<T> = Result<T, ObsError>;
