//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (optional, loaded by main)
//!     → config file (TOML, optional)
//!     → loader.rs (parse, deserialize, apply env overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc to the monitor and the control surface
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults; a bare environment is a valid deployment
//! - The poll interval is a constant, not a config field

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, MonitorConfig, ObsConfig, ObservabilityConfig, SceneConfig, ServerConfig,
    SupervisorConfig, MONITOR_INTERVAL,
};
