//! Shared utilities for integration testing.
#![allow(dead_code)]

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

use brb_switcher::config::{AppConfig, ObsConfig};
use brb_switcher::monitor::MonitorSettings;
use brb_switcher::obs::auth::auth_response;
use brb_switcher::obs::{BroadcastControl, ObsError, ObsResult, ObsVersion, StreamStatus};

/// Default monitor settings (MAIN/BRB, "Flux", 1000 Kbps) with a short interval.
pub fn settings() -> MonitorSettings {
    MonitorSettings::from_config(&AppConfig::default()).with_interval(Duration::from_millis(10))
}

// --- Scripted BroadcastControl ---

/// What the mock answers to a media cursor query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorReply {
    At(f64),
    Missing,
    /// Input missing or not a media source.
    NotFound,
    /// Session dropped while querying.
    Disconnected,
}

/// Failure injected into `stream_status`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusFailure {
    Disconnected,
    Timeout,
}

#[derive(Debug)]
pub struct MockState {
    pub connected: bool,
    pub connect_succeeds: bool,
    pub connect_calls: usize,
    /// Sessions opened; bumped by `connect` and `reopen_session`.
    pub epoch: u64,
    pub active: bool,
    pub bitrate_kbps: f64,
    pub cursor: CursorReply,
    pub scene: String,
    pub scene_changes: Vec<String>,
    pub status_failure: Option<StatusFailure>,
    pub status_calls: usize,
    pub panics_remaining: usize,
    pub start_fails: bool,
    pub stop_fails: bool,
    pub version_fails: bool,
    pub starts: usize,
    pub stops: usize,
}

/// In-memory stand-in for OBS. Scene changes are recorded and applied.
#[derive(Debug)]
pub struct MockControl {
    state: Mutex<MockState>,
}

impl MockControl {
    /// Connected, streaming at 5000 Kbps, cursor at 0, on `scene`.
    pub fn streaming(scene: &str) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(MockState {
                connected: true,
                connect_succeeds: true,
                connect_calls: 0,
                epoch: 1,
                active: true,
                bitrate_kbps: 5000.0,
                cursor: CursorReply::At(0.0),
                scene: scene.to_string(),
                scene_changes: Vec::new(),
                status_failure: None,
                status_calls: 0,
                panics_remaining: 0,
                start_fails: false,
                stop_fails: false,
                version_fails: false,
                starts: 0,
                stops: 0,
            }),
        })
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    pub fn scene_changes(&self) -> Vec<String> {
        self.with(|s| s.scene_changes.clone())
    }

    /// Drop and reopen the session behind the monitor's back, as a control
    /// request hitting a dead socket would.
    pub fn reopen_session(&self) {
        self.with(|s| {
            s.connected = true;
            s.epoch += 1;
        });
    }

    /// Advance the cursor so the next tick sees movement.
    pub fn advance_cursor(&self, by: f64) {
        self.with(|s| {
            if let CursorReply::At(c) = s.cursor {
                s.cursor = CursorReply::At(c + by);
            }
        });
    }
}

#[async_trait]
impl BroadcastControl for MockControl {
    async fn connect(&self) -> ObsResult<()> {
        self.with(|s| {
            s.connect_calls += 1;
            if s.connect_succeeds {
                s.connected = true;
                s.epoch += 1;
                Ok(())
            } else {
                Err(ObsError::Connection("connection refused".into()))
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.with(|s| s.connected)
    }

    fn session_epoch(&self) -> u64 {
        self.with(|s| s.epoch)
    }

    async fn stream_status(&self) -> ObsResult<StreamStatus> {
        let (should_panic, result) = self.with(|s| {
            s.status_calls += 1;
            if s.panics_remaining > 0 {
                s.panics_remaining -= 1;
                return (true, Err(ObsError::Protocol("unreachable".into())));
            }
            let result = match s.status_failure {
                Some(StatusFailure::Disconnected) => {
                    s.connected = false;
                    Err(ObsError::Connection("socket closed".into()))
                }
                Some(StatusFailure::Timeout) => Err(ObsError::Timeout(5)),
                None => Ok(StreamStatus { active: s.active, bitrate_kbps: s.bitrate_kbps }),
            };
            (false, result)
        });
        if should_panic {
            panic!("injected monitor panic");
        }
        result
    }

    async fn media_cursor(&self, input_name: &str) -> ObsResult<Option<f64>> {
        self.with(|s| match s.cursor {
            CursorReply::At(c) => Ok(Some(c)),
            CursorReply::Missing => Ok(None),
            CursorReply::NotFound => Err(ObsError::Request {
                request_type: "GetMediaInputStatus".into(),
                code: 600,
                comment: format!("No source was found by the name of `{}`.", input_name),
            }),
            CursorReply::Disconnected => {
                s.connected = false;
                Err(ObsError::Connection("socket closed".into()))
            }
        })
    }

    async fn current_scene(&self) -> ObsResult<String> {
        Ok(self.with(|s| s.scene.clone()))
    }

    async fn set_current_scene(&self, scene_name: &str) -> ObsResult<()> {
        self.with(|s| {
            s.scene = scene_name.to_string();
            s.scene_changes.push(scene_name.to_string());
        });
        Ok(())
    }

    async fn start_stream(&self) -> ObsResult<()> {
        self.with(|s| {
            if s.start_fails {
                return Err(ObsError::Request {
                    request_type: "StartStream".into(),
                    code: 500,
                    comment: "Output already active.".into(),
                });
            }
            s.starts += 1;
            Ok(())
        })
    }

    async fn stop_stream(&self) -> ObsResult<()> {
        self.with(|s| {
            if s.stop_fails {
                return Err(ObsError::Timeout(5));
            }
            s.stops += 1;
            Ok(())
        })
    }

    async fn version(&self) -> ObsResult<ObsVersion> {
        self.with(|s| {
            if s.version_fails {
                Err(ObsError::Connection("connection refused".into()))
            } else {
                Ok(ObsVersion {
                    obs_version: "30.1.2".into(),
                    websocket_version: "5.4.2".into(),
                    rpc_version: 1,
                })
            }
        })
    }
}

// --- Fake obs-websocket server ---

pub const FAKE_SALT: &str = "lM1GncleQOaCu9lT1yeUZhFYnqhsLLP1G5lAGo3ixaI=";
pub const FAKE_CHALLENGE: &str = "+IxH4CnCiqpX1rM9scsNynZzbOe4KhDeYcTNS3PDaeY=";

#[derive(Debug, Default)]
pub struct FakeObsState {
    pub scene: String,
    pub output_active: bool,
    pub output_bytes: u64,
    pub output_duration: u64,
    /// Added to the byte counter on every GetStreamStatus (5 s of output).
    pub bytes_per_poll: u64,
    pub media_cursor: Option<f64>,
    pub connections: usize,
    pub requests: Vec<String>,
    /// Close the socket instead of answering the next request.
    pub drop_next_request: bool,
    /// Read requests but never answer them.
    pub stall_requests: bool,
}

pub fn fake_obs_config(addr: SocketAddr, password: &str) -> ObsConfig {
    ObsConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        password: password.to_string(),
        timeout_secs: 2,
    }
}

/// Start a fake OBS on an ephemeral port. `password` enables authentication.
pub async fn start_fake_obs(
    password: Option<&'static str>,
    state: FakeObsState,
) -> (SocketAddr, Arc<Mutex<FakeObsState>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = Arc::new(Mutex::new(state));

    let shared = state.clone();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let state = shared.clone();
            tokio::spawn(async move {
                if let Ok(ws) = tokio_tungstenite::accept_async(socket).await {
                    serve_fake_obs(ws, password, state).await;
                }
            });
        }
    });

    (addr, state)
}

async fn serve_fake_obs<S>(
    mut ws: tokio_tungstenite::WebSocketStream<S>,
    password: Option<&'static str>,
    state: Arc<Mutex<FakeObsState>>,
) where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    let mut hello = json!({ "obsWebSocketVersion": "5.4.2", "rpcVersion": 1 });
    if password.is_some() {
        hello["authentication"] = json!({ "challenge": FAKE_CHALLENGE, "salt": FAKE_SALT });
    }
    let _ = ws.send(frame(0, hello)).await;

    let Some(identify) = next_json(&mut ws).await else { return };
    if let Some(password) = password {
        let expected = auth_response(password, FAKE_SALT, FAKE_CHALLENGE);
        if identify["d"]["authentication"].as_str() != Some(expected.as_str()) {
            let _ = ws
                .close(Some(CloseFrame {
                    code: CloseCode::from(4009),
                    reason: "Authentication failed.".into(),
                }))
                .await;
            return;
        }
    }
    let _ = ws.send(frame(2, json!({ "negotiatedRpcVersion": 1 }))).await;
    state.lock().unwrap().connections += 1;

    while let Some(request) = next_json(&mut ws).await {
        let request_type = request["d"]["requestType"].as_str().unwrap_or_default().to_string();
        let request_id = request["d"]["requestId"].clone();
        let data = request["d"]["requestData"].clone();

        let reply = {
            let mut s = state.lock().unwrap();
            if s.drop_next_request {
                s.drop_next_request = false;
                return;
            }
            s.requests.push(request_type.clone());
            if s.stall_requests {
                None
            } else {
                Some(answer(&mut s, &request_type, &data))
            }
        };
        let Some((ok, code, response_data)) = reply else { continue };

        // Unsolicited event first; the client must skip it.
        let _ = ws
            .send(frame(5, json!({ "eventType": "CurrentProgramSceneChanged", "eventIntent": 4 })))
            .await;
        let _ = ws
            .send(frame(
                7,
                json!({
                    "requestType": request_type,
                    "requestId": request_id,
                    "requestStatus": { "result": ok, "code": code, "comment": if ok { Value::Null } else { json!("Request failed.") } },
                    "responseData": response_data,
                }),
            ))
            .await;
    }
}

fn answer(s: &mut FakeObsState, request_type: &str, data: &Value) -> (bool, u16, Value) {
    match request_type {
        "GetVersion" => (
            true,
            100,
            json!({ "obsVersion": "30.1.2", "obsWebSocketVersion": "5.4.2", "rpcVersion": 1 }),
        ),
        "GetStreamStatus" => {
            if s.output_active {
                s.output_bytes += s.bytes_per_poll;
                s.output_duration += 5_000;
            }
            (
                true,
                100,
                json!({
                    "outputActive": s.output_active,
                    "outputReconnecting": false,
                    "outputBytes": s.output_bytes,
                    "outputDuration": s.output_duration,
                }),
            )
        }
        "GetMediaInputStatus" => {
            if data["inputName"] == "Flux" {
                (true, 100, json!({ "mediaState": "OBS_MEDIA_STATE_PLAYING", "mediaCursor": s.media_cursor }))
            } else {
                (false, 600, Value::Null)
            }
        }
        "GetCurrentProgramScene" => (true, 100, json!({ "currentProgramSceneName": s.scene })),
        "SetCurrentProgramScene" => {
            s.scene = data["sceneName"].as_str().unwrap_or_default().to_string();
            (true, 100, Value::Null)
        }
        "StartStream" => {
            s.output_active = true;
            (true, 100, Value::Null)
        }
        "StopStream" => {
            s.output_active = false;
            (true, 100, Value::Null)
        }
        _ => (false, 204, Value::Null),
    }
}

fn frame(op: u8, d: Value) -> Message {
    Message::text(json!({ "op": op, "d": d }).to_string())
}

async fn next_json<S>(ws: &mut tokio_tungstenite::WebSocketStream<S>) -> Option<Value>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    while let Some(Ok(msg)) = ws.next().await {
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).ok();
        }
    }
    None
}
