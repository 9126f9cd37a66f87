//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the switcher.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Seconds between two health checks of the broadcast.
pub const MONITOR_INTERVAL_SECS: u64 = 5;

/// Poll interval of the health monitor. Fixed, not read from config.
pub const MONITOR_INTERVAL: Duration = Duration::from_secs(MONITOR_INTERVAL_SECS);

/// Root configuration for the switcher.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Control surface listener.
    pub server: ServerConfig,

    /// OBS WebSocket connection.
    pub obs: ObsConfig,

    /// Scene names to switch between.
    pub scenes: SceneConfig,

    /// Health verdict inputs.
    pub monitor: MonitorConfig,

    /// Restart policy for the monitor task.
    pub supervisor: SupervisorConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Control surface listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:5987").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5987".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// OBS WebSocket connection parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObsConfig {
    pub host: String,

    pub port: u16,

    /// Empty when authentication is disabled in OBS.
    pub password: String,

    /// Bound applied to the handshake and to every request.
    pub timeout_secs: u64,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4455,
            password: String::new(),
            timeout_secs: 5,
        }
    }
}

impl ObsConfig {
    /// WebSocket URL of the OBS server.
    pub fn url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Scene pair the monitor switches between.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Scene shown while the broadcast is healthy.
    pub main: String,

    /// Be-right-back scene shown while the broadcast is degraded.
    pub brb: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            main: "MAIN".to_string(),
            brb: "BRB".to_string(),
        }
    }
}

/// Health verdict configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Media input whose playback cursor must keep moving.
    pub source_name: String,

    /// Minimum output bitrate in Kbps. Equal counts as healthy.
    pub bitrate_threshold_kbps: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            source_name: "Flux".to_string(),
            bitrate_threshold_kbps: 1000,
        }
    }
}

/// Restart policy for the supervised monitor task.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 500,
            max_delay_ms: 30_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
