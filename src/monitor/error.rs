//! Monitor tick errors, one variant per failure category.

use thiserror::Error;

use crate::obs::ObsError;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// OBS could not be reached or rejected the credentials.
    #[error("OBS unreachable: {0}")]
    Connectivity(#[source] ObsError),

    /// One health signal could not be read. The tick continues without it.
    #[error("{signal} query failed: {source}")]
    SignalQuery {
        signal: &'static str,
        source: ObsError,
    },

    /// Anything else; the tick is abandoned.
    #[error("Unexpected OBS error: {0}")]
    Unexpected(#[source] ObsError),
}

impl MonitorError {
    /// Label used in logs and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            MonitorError::Connectivity(_) => "connectivity",
            MonitorError::SignalQuery { .. } => "signal_query",
            MonitorError::Unexpected(_) => "unexpected",
        }
    }
}

impl From<ObsError> for MonitorError {
    fn from(err: ObsError) -> Self {
        if err.is_connectivity() {
            MonitorError::Connectivity(err)
        } else {
            MonitorError::Unexpected(err)
        }
    }
}
