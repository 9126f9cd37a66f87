//! Control surface handlers. Each one forwards a single call to OBS.

use axum::extract::State;
use axum::http::StatusCode;

use crate::http::response::{ApiResponse, ControlError};
use crate::http::server::AppState;
use crate::observability::metrics;

pub async fn start_stream(State(state): State<AppState>) -> Result<ApiResponse, ControlError> {
    let result = match state.control.start_stream().await {
        Ok(()) => Ok(ApiResponse::ok("Stream started.")),
        Err(e) => {
            tracing::error!(error = %e, "Failed to start stream");
            Err(ControlError::Command(e))
        }
    };
    record("start", result)
}

pub async fn stop_stream(State(state): State<AppState>) -> Result<ApiResponse, ControlError> {
    let result = match state.control.stop_stream().await {
        Ok(()) => Ok(ApiResponse::ok("Stream stopped.")),
        Err(e) => {
            tracing::error!(error = %e, "Failed to stop stream");
            Err(ControlError::Command(e))
        }
    };
    record("stop", result)
}

pub async fn health(State(state): State<AppState>) -> Result<ApiResponse, ControlError> {
    let result = match state.control.version().await {
        Ok(version) => {
            tracing::debug!(obs_version = %version.obs_version, "OBS reachable");
            Ok(ApiResponse::ok("Connected to OBS WebSocket."))
        }
        Err(e) => {
            tracing::warn!(error = %e, "OBS health check failed");
            Err(ControlError::Unavailable(e))
        }
    };
    record("health", result)
}

fn record(
    route: &'static str,
    result: Result<ApiResponse, ControlError>,
) -> Result<ApiResponse, ControlError> {
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => e.status_code(),
    };
    metrics::record_control_request(route, status.as_u16());
    result
}
