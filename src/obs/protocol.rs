//! obs-websocket v5 wire messages.
//!
//! Every frame is a JSON text message `{"op": <opcode>, "d": <payload>}`.
//! Only the opcodes needed for request/response traffic are modelled; events
//! are never subscribed to and are skipped if they arrive anyway.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::obs::types::{ObsError, ObsResult};

pub const OP_HELLO: u8 = 0;
pub const OP_IDENTIFY: u8 = 1;
pub const OP_IDENTIFIED: u8 = 2;
pub const OP_EVENT: u8 = 5;
pub const OP_REQUEST: u8 = 6;
pub const OP_REQUEST_RESPONSE: u8 = 7;

/// RPC version spoken by this client.
pub const RPC_VERSION: u32 = 1;

/// WebSocket close code sent by OBS when the auth string is wrong.
pub const CLOSE_AUTHENTICATION_FAILED: u16 = 4009;

/// Generic frame, payload decoded lazily per opcode.
#[derive(Debug, Deserialize, Serialize)]
pub struct Envelope {
    pub op: u8,
    pub d: Value,
}

impl Envelope {
    pub fn parse(text: &str) -> ObsResult<Self> {
        serde_json::from_str(text).map_err(|e| ObsError::Protocol(format!("Malformed frame: {}", e)))
    }

    /// Decode the payload, checking the opcode first.
    pub fn payload<T: for<'de> Deserialize<'de>>(self, expected_op: u8) -> ObsResult<T> {
        if self.op != expected_op {
            return Err(ObsError::Protocol(format!(
                "Expected opcode {}, got {}",
                expected_op, self.op
            )));
        }
        serde_json::from_value(self.d)
            .map_err(|e| ObsError::Protocol(format!("Malformed op {} payload: {}", expected_op, e)))
    }
}

/// Serialize a payload into a frame.
pub fn encode<T: Serialize>(op: u8, d: &T) -> ObsResult<String> {
    let d = serde_json::to_value(d).map_err(|e| ObsError::Protocol(e.to_string()))?;
    serde_json::to_string(&Envelope { op, d }).map_err(|e| ObsError::Protocol(e.to_string()))
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hello {
    pub obs_web_socket_version: String,
    pub rpc_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<AuthChallenge>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AuthChallenge {
    pub challenge: String,
    pub salt: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identify {
    pub rpc_version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<String>,
    pub event_subscriptions: u32,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identified {
    pub negotiated_rpc_version: u32,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub request_type: String,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_data: Option<Value>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponse {
    pub request_type: String,
    pub request_id: String,
    pub request_status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_data: Option<Value>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RequestStatus {
    pub result: bool,
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RequestResponse {
    /// Turn a failed status into an error, otherwise return the response data.
    pub fn into_result(self) -> ObsResult<Value> {
        if !self.request_status.result {
            return Err(ObsError::Request {
                request_type: self.request_type,
                code: self.request_status.code,
                comment: self.request_status.comment.unwrap_or_default(),
            });
        }
        Ok(self.response_data.unwrap_or(Value::Null))
    }
}

// --- Response payloads ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamStatusData {
    pub output_active: bool,
    #[serde(default)]
    pub output_bytes: u64,
    /// Milliseconds since the output started.
    #[serde(default)]
    pub output_duration: u64,
    /// Not part of stock obs-websocket; honoured when a server provides it.
    #[serde(default)]
    pub output_bitrate: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInputStatusData {
    #[serde(default)]
    pub media_cursor: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentProgramSceneData {
    #[serde(default)]
    pub current_program_scene_name: Option<String>,
    #[serde(default)]
    pub scene_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionData {
    pub obs_version: String,
    pub obs_web_socket_version: String,
    pub rpc_version: u32,
}

/// Decode typed response data.
pub fn decode<T: for<'de> Deserialize<'de>>(request_type: &str, data: Value) -> ObsResult<T> {
    serde_json::from_value(data)
        .map_err(|e| ObsError::Protocol(format!("Malformed {} response: {}", request_type, e)))
}
