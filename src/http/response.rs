//! Control surface response bodies.
//!
//! Every route answers `{"status": "ok"|"error", "message": ...}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::obs::ObsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: ApiStatus,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self { status: ApiStatus::Ok, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { status: ApiStatus::Error, message: message.into() }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// A control command that OBS did not carry out.
#[derive(Debug)]
pub enum ControlError {
    /// Start/stop failed: 500.
    Command(ObsError),
    /// Liveness ping failed: 503.
    Unavailable(ObsError),
}

impl ControlError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ControlError::Command(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ControlError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn body(&self) -> ApiResponse {
        match self {
            ControlError::Command(e) => ApiResponse::error(e.to_string()),
            ControlError::Unavailable(e) => ApiResponse::error(format!("Disconnected from OBS: {}", e)),
        }
    }
}

impl IntoResponse for ControlError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
