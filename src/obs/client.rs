//! obs-websocket v5 client with timeout and error handling.
//!
//! # Responsibilities
//! - Open the WebSocket and complete the Hello/Identify handshake
//! - Issue requests and match responses by request id
//! - Bound every call by the configured timeout
//! - Drop the session on transport failure so the next call reconnects

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex as StdMutex, PoisonError};
use std::time::Instant;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use uuid::Uuid;

use crate::config::ObsConfig;
use crate::obs::auth::auth_response;
use crate::obs::protocol::{
    self, CurrentProgramSceneData, Envelope, Hello, Identified, Identify, MediaInputStatusData,
    Request, RequestResponse, StreamStatusData, VersionData, CLOSE_AUTHENTICATION_FAILED,
    OP_EVENT, OP_HELLO, OP_IDENTIFIED, OP_IDENTIFY, OP_REQUEST, OP_REQUEST_RESPONSE, RPC_VERSION,
};
use crate::obs::types::{ObsError, ObsResult, ObsVersion, StreamStatus};
use crate::obs::BroadcastControl;
use crate::observability::metrics;
use crate::resilience::timeouts::with_timeout;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Shared OBS client.
///
/// One session serves the monitor and the control surface. Calls are
/// serialized by the session mutex, which is held for one call only.
/// The configured timeout bounds each caller end to end, including the
/// wait for the mutex.
pub struct ObsClient {
    config: ObsConfig,
    session: Mutex<Option<WsStream>>,
    connected: AtomicBool,
    /// Sessions opened so far.
    epoch: AtomicU64,
    bitrate: StdMutex<BitrateEstimator>,
}

impl ObsClient {
    /// Create a disconnected client. Call [`BroadcastControl::connect`] to open the session.
    pub fn new(config: ObsConfig) -> Self {
        Self {
            config,
            session: Mutex::new(None),
            connected: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
            bitrate: StdMutex::new(BitrateEstimator::default()),
        }
    }

    async fn open_session(&self) -> ObsResult<WsStream> {
        let url = self.config.url();
        with_timeout(self.config.timeout(), async {
            let (mut ws, _) = connect_async(url.as_str())
                .await
                .map_err(|e| ObsError::Connection(format!("Failed to connect to {}: {}", url, e)))?;
            handshake(&mut ws, &self.config.password).await?;
            Ok::<_, ObsError>(ws)
        })
        .await
    }

    fn mark_connected(&self, session: &mut Option<WsStream>, ws: WsStream) {
        *session = Some(ws);
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.connected.store(true, Ordering::SeqCst);
    }

    fn mark_disconnected(&self, session: &mut Option<WsStream>) {
        *session = None;
        self.connected.store(false, Ordering::SeqCst);
        self.bitrate.lock().unwrap_or_else(PoisonError::into_inner).reset();
    }

    /// Send one request and wait for its response, connecting first if needed.
    async fn call(&self, request_type: &str, request_data: Option<Value>) -> ObsResult<Value> {
        let start = Instant::now();
        let result = with_timeout(
            self.config.timeout(),
            self.call_in_session(request_type, request_data),
        )
        .await;
        metrics::record_obs_request(request_type, result.is_ok(), start);
        result
    }

    async fn call_in_session(&self, request_type: &str, request_data: Option<Value>) -> ObsResult<Value> {
        let mut guard = self.session.lock().await;

        if guard.is_none() {
            let ws = self.open_session().await?;
            self.mark_connected(&mut guard, ws);
            tracing::info!(url = %self.config.url(), "OBS session opened");
        }
        let Some(ws) = guard.as_mut() else {
            return Err(ObsError::Connection("No OBS session".to_string()));
        };

        tracing::debug!(request_type, "OBS request");
        let result = send_request(ws, request_type, request_data).await;

        if let Err(e) = &result {
            if e.is_connectivity() {
                tracing::warn!(request_type, error = %e, "OBS session lost");
                self.mark_disconnected(&mut guard);
            }
        }
        result
    }
}

#[async_trait]
impl BroadcastControl for ObsClient {
    async fn connect(&self) -> ObsResult<()> {
        let mut guard = self.session.lock().await;
        if guard.is_some() {
            return Ok(());
        }

        match self.open_session().await {
            Ok(ws) => {
                self.mark_connected(&mut guard, ws);
                tracing::info!(url = %self.config.url(), "Connected to OBS WebSocket");
                Ok(())
            }
            Err(e) => {
                self.mark_disconnected(&mut guard);
                Err(e)
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn session_epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    async fn stream_status(&self) -> ObsResult<StreamStatus> {
        let data = self.call("GetStreamStatus", None).await?;
        let status: StreamStatusData = protocol::decode("GetStreamStatus", data)?;

        let mut estimator = self.bitrate.lock().unwrap_or_else(PoisonError::into_inner);
        if !status.output_active {
            estimator.reset();
            return Ok(StreamStatus { active: false, bitrate_kbps: 0.0 });
        }

        let bitrate_kbps = match status.output_bitrate {
            Some(kbps) => kbps,
            None => estimator.sample(status.output_bytes, status.output_duration),
        };
        Ok(StreamStatus { active: true, bitrate_kbps })
    }

    async fn media_cursor(&self, input_name: &str) -> ObsResult<Option<f64>> {
        let data = self
            .call("GetMediaInputStatus", Some(json!({ "inputName": input_name })))
            .await?;
        let status: MediaInputStatusData = protocol::decode("GetMediaInputStatus", data)?;
        Ok(status.media_cursor)
    }

    async fn current_scene(&self) -> ObsResult<String> {
        let data = self.call("GetCurrentProgramScene", None).await?;
        let scene: CurrentProgramSceneData = protocol::decode("GetCurrentProgramScene", data)?;
        scene
            .current_program_scene_name
            .or(scene.scene_name)
            .ok_or_else(|| ObsError::Protocol("GetCurrentProgramScene returned no scene name".to_string()))
    }

    async fn set_current_scene(&self, scene_name: &str) -> ObsResult<()> {
        self.call("SetCurrentProgramScene", Some(json!({ "sceneName": scene_name })))
            .await
            .map(|_| ())
    }

    async fn start_stream(&self) -> ObsResult<()> {
        self.call("StartStream", None).await.map(|_| ())
    }

    async fn stop_stream(&self) -> ObsResult<()> {
        self.call("StopStream", None).await.map(|_| ())
    }

    async fn version(&self) -> ObsResult<ObsVersion> {
        let data = self.call("GetVersion", None).await?;
        let version: VersionData = protocol::decode("GetVersion", data)?;
        Ok(ObsVersion {
            obs_version: version.obs_version,
            websocket_version: version.obs_web_socket_version,
            rpc_version: version.rpc_version,
        })
    }
}

impl std::fmt::Debug for ObsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObsClient")
            .field("url", &self.config.url())
            .field("timeout_secs", &self.config.timeout_secs)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Hello → Identify → Identified.
async fn handshake(ws: &mut WsStream, password: &str) -> ObsResult<()> {
    let hello: Hello = Envelope::parse(&next_text(ws).await?)?.payload(OP_HELLO)?;

    let authentication = hello
        .authentication
        .map(|challenge| auth_response(password, &challenge.salt, &challenge.challenge));
    let identify = Identify {
        rpc_version: RPC_VERSION,
        authentication,
        event_subscriptions: 0,
    };
    send_text(ws, protocol::encode(OP_IDENTIFY, &identify)?).await?;

    let identified: Identified = Envelope::parse(&next_text(ws).await?)?.payload(OP_IDENTIFIED)?;
    tracing::debug!(
        obs_websocket_version = %hello.obs_web_socket_version,
        rpc_version = identified.negotiated_rpc_version,
        "OBS handshake complete"
    );
    Ok(())
}

async fn send_request(
    ws: &mut WsStream,
    request_type: &str,
    request_data: Option<Value>,
) -> ObsResult<Value> {
    let request_id = Uuid::new_v4().to_string();
    let request = Request {
        request_type: request_type.to_string(),
        request_id: request_id.clone(),
        request_data,
    };
    send_text(ws, protocol::encode(OP_REQUEST, &request)?).await?;

    loop {
        let envelope = Envelope::parse(&next_text(ws).await?)?;
        match envelope.op {
            OP_REQUEST_RESPONSE => {
                let response: RequestResponse = envelope.payload(OP_REQUEST_RESPONSE)?;
                if response.request_id != request_id {
                    // Answer to a call that timed out earlier.
                    tracing::debug!(request_id = %response.request_id, "Discarding stale OBS response");
                    continue;
                }
                return response.into_result();
            }
            OP_EVENT => continue,
            op => tracing::debug!(op, "Ignoring unexpected OBS frame"),
        }
    }
}

async fn send_text(ws: &mut WsStream, text: String) -> ObsResult<()> {
    ws.send(Message::text(text))
        .await
        .map_err(|e| ObsError::Connection(format!("Failed to send: {}", e)))
}

/// Next text frame. Close frames and transport errors end the session.
async fn next_text(ws: &mut WsStream) -> ObsResult<String> {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(text))) => return Ok(text.as_str().to_owned()),
            Some(Ok(Message::Close(frame))) => {
                return Err(match frame {
                    Some(frame) if u16::from(frame.code) == CLOSE_AUTHENTICATION_FAILED => {
                        ObsError::Auth(frame.reason.as_str().to_owned())
                    }
                    Some(frame) => ObsError::Connection(format!(
                        "Closed by OBS ({}): {}",
                        u16::from(frame.code),
                        frame.reason.as_str()
                    )),
                    None => ObsError::Connection("Closed by OBS".to_string()),
                });
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(ObsError::Connection(e.to_string())),
            None => return Err(ObsError::Connection("Connection closed".to_string())),
        }
    }
}

/// Derives output bitrate from the cumulative byte and duration counters.
///
/// The first sample of an output (or one taken after the counters went
/// backwards) falls back to the lifetime average.
#[derive(Debug, Default)]
pub struct BitrateEstimator {
    last: Option<(u64, u64)>,
}

impl BitrateEstimator {
    /// Record a sample and return the bitrate in Kbps.
    pub fn sample(&mut self, output_bytes: u64, output_duration_ms: u64) -> f64 {
        let kbps = match self.last {
            Some((prev_bytes, prev_ms))
                if output_bytes >= prev_bytes && output_duration_ms > prev_ms =>
            {
                (output_bytes - prev_bytes) as f64 * 8.0 / (output_duration_ms - prev_ms) as f64
            }
            _ if output_duration_ms > 0 => output_bytes as f64 * 8.0 / output_duration_ms as f64,
            _ => 0.0,
        };
        self.last = Some((output_bytes, output_duration_ms));
        kbps
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
