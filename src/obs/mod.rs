//! OBS integration subsystem.
//!
//! # Data Flow
//! ```text
//! ObsConfig (host, port, password, timeout)
//!     → client.rs (WebSocket session, per-call timeout)
//!     → protocol.rs (obs-websocket v5 frames)
//!     → auth.rs (challenge response)
//! ```
//!
//! # Constraints
//! - Never log the password or the auth string
//! - All calls have the configured timeout
//! - The process keeps running when OBS is unreachable

pub mod auth;
pub mod client;
pub mod protocol;
pub mod types;

use async_trait::async_trait;

pub use client::ObsClient;
pub use types::{ObsError, ObsResult, ObsVersion, StreamStatus};

/// Operations the switcher needs from the broadcast control plane.
///
/// Implementations must be safe for concurrent use: the monitor task and the
/// HTTP handlers share one instance.
#[async_trait]
pub trait BroadcastControl: Send + Sync {
    /// Open the session if it is not open already.
    async fn connect(&self) -> ObsResult<()>;

    fn is_connected(&self) -> bool;

    /// Number of sessions opened so far.
    ///
    /// Any caller may reopen a dropped session, so a change between two
    /// reads means the connection was lost in between.
    fn session_epoch(&self) -> u64;

    async fn stream_status(&self) -> ObsResult<StreamStatus>;

    /// Playback cursor of a media input, in milliseconds.
    ///
    /// `Ok(None)` when the input exists but reports no cursor. Missing inputs
    /// and inputs that are not media sources fail with [`ObsError::Request`].
    async fn media_cursor(&self, input_name: &str) -> ObsResult<Option<f64>>;

    /// Name of the scene currently on program output.
    async fn current_scene(&self) -> ObsResult<String>;

    async fn set_current_scene(&self, scene_name: &str) -> ObsResult<()>;

    async fn start_stream(&self) -> ObsResult<()>;

    async fn stop_stream(&self) -> ObsResult<()>;

    /// Liveness ping.
    async fn version(&self) -> ObsResult<ObsVersion>;
}
