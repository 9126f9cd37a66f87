//! Startup orchestration.
//!
//! Initializes subsystems in dependency order: metrics, OBS session, monitor
//! supervisor, then the control surface listener (traffic only when ready).

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::http::HttpServer;
use crate::lifecycle::supervisor::spawn_supervised_monitor;
use crate::lifecycle::Shutdown;
use crate::monitor::{MonitorSettings, StreamMonitor};
use crate::obs::{BroadcastControl, ObsClient};
use crate::observability::metrics;
use crate::resilience::backoff::Backoff;

/// Run the switcher until `shutdown` fires.
pub async fn run(config: AppConfig, shutdown: Shutdown) -> Result<(), Box<dyn Error>> {
    let config = Arc::new(config);

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let client = Arc::new(ObsClient::new(config.obs.clone()));
    match client.connect().await {
        Ok(()) => tracing::info!(url = %config.obs.url(), "Connected to OBS WebSocket"),
        Err(e) => {
            // Keep serving: OBS may come up later.
            tracing::error!(url = %config.obs.url(), error = %e, "Initial connection to OBS failed");
            tracing::error!("Monitoring and the API will not work until OBS is reachable");
        }
    }
    let control: Arc<dyn BroadcastControl> = client;

    let settings = MonitorSettings::from_config(&config);
    let monitor_control = control.clone();
    let supervisor = spawn_supervised_monitor(
        move || StreamMonitor::new(monitor_control.clone(), settings.clone()),
        shutdown.clone(),
        Backoff::from_config(&config.supervisor),
    );
    tracing::info!("Monitor task started");

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    HttpServer::new(config.clone(), control)
        .run(listener, shutdown.subscribe())
        .await?;

    // The server may also stop on its own; make sure the monitor follows.
    shutdown.trigger();
    if let Err(e) = supervisor.await {
        tracing::warn!(error = %e, "Monitor supervisor ended abnormally");
    }

    Ok(())
}
