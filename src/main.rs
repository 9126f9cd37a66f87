//! BRB scene switcher for OBS.
//!
//! Watches a live OBS broadcast and flips to a be-right-back scene when the
//! stream degrades, then back to the main scene once it recovers.
//!
//! # Architecture Overview
//!
//! ```text
//!   .env / config.toml / environment
//!            │
//!            ▼
//!     ┌─────────────┐        ┌──────────────────────────────┐
//!     │  AppConfig  │──────▶ │ supervisor → StreamMonitor   │──┐
//!     └─────────────┘        │   every 5 s: status, cursor, │  │
//!            │               │   verdict, scene switch      │  │
//!            │               └──────────────────────────────┘  │
//!            ▼                                                 ▼
//!     ┌─────────────┐   GET /start /stop /health   ┌──────────────────┐
//!     │ HttpServer  │ ───────────────────────────▶ │ ObsClient (ws v5)│──▶ OBS
//!     └─────────────┘                              └──────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use brb_switcher::config::load_config;
use brb_switcher::lifecycle::{signals, startup, Shutdown};
use brb_switcher::observability::logging;

#[derive(Parser)]
#[command(name = "brb-switcher")]
#[command(about = "Switch OBS to a BRB scene while the stream is unhealthy", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long, env = "BRB_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();

    let config = load_config(cli.config.as_deref())?;
    logging::init_logging(&config.observability);

    tracing::info!("brb-switcher v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        obs_url = %config.obs.url(),
        main_scene = %config.scenes.main,
        brb_scene = %config.scenes.brb,
        source = %config.monitor.source_name,
        threshold_kbps = config.monitor.bitrate_threshold_kbps,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    startup::run(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
