//! BRB scene switcher library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod monitor;
pub mod obs;
pub mod observability;
pub mod resilience;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use monitor::StreamMonitor;
pub use obs::{BroadcastControl, ObsClient};
