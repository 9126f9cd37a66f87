//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the control routes
//! - Wire up middleware (tracing, timeout, request ID)
//! - Serve until the shutdown signal

use axum::http::HeaderName;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::handlers;
use crate::obs::BroadcastControl;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Process-wide context injected into handlers.
///
/// Handlers only call OBS; the monitor's cursor memory is not part of it.
#[derive(Clone)]
pub struct AppState {
    pub control: Arc<dyn BroadcastControl>,
}

/// HTTP server for the control surface.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: Arc<AppConfig>, control: Arc<dyn BroadcastControl>) -> Self {
        let router = Self::build_router(&config, AppState { control });
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route("/start", get(handlers::start_stream))
            .route("/stop", get(handlers::stop_stream))
            .route("/health", get(handlers::health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
    }

    /// The router, for serving or for driving in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Control surface listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
