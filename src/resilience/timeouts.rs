//! Timeout enforcement.
//!
//! Every call to OBS goes through [`with_timeout`]; an elapsed deadline is
//! reported as [`ObsError::Timeout`], never as a hang.

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::obs::{ObsError, ObsResult};

/// Run `fut`, failing with [`ObsError::Timeout`] once `limit` elapses.
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> ObsResult<T>
where
    F: Future<Output = ObsResult<T>>,
{
    match timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(ObsError::Timeout(limit.as_secs())),
    }
}
