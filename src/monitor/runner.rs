//! Periodic stream health monitor.
//!
//! # Responsibilities
//! - Sample stream status and the media cursor each tick
//! - Turn the samples into a [`Verdict`]
//! - Switch between the main and BRB scenes when verdict and scene disagree

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time;

use crate::config::{AppConfig, MONITOR_INTERVAL};
use crate::monitor::error::MonitorError;
use crate::monitor::scene::{decide, SceneAction, SceneKind};
use crate::monitor::verdict::{evaluate_bitrate, CursorCheck, FreezeDetector, UnhealthyReason, Verdict};
use crate::obs::BroadcastControl;
use crate::observability::metrics;

/// Inputs of the monitor, taken from [`AppConfig`] once at startup.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub main_scene: String,
    pub brb_scene: String,
    pub source_name: String,
    pub bitrate_threshold_kbps: u64,
    pub interval: Duration,
}

impl MonitorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            main_scene: config.scenes.main.clone(),
            brb_scene: config.scenes.brb.clone(),
            source_name: config.monitor.source_name.clone(),
            bitrate_threshold_kbps: config.monitor.bitrate_threshold_kbps,
            interval: MONITOR_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No OBS session; verdict skipped.
    Disconnected,
    /// Stream output is off; verdict skipped.
    NotStreaming,
    Evaluated {
        verdict: Verdict,
        scene: String,
        action: SceneAction,
    },
}

impl TickOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            TickOutcome::Disconnected => "disconnected",
            TickOutcome::NotStreaming => "not_streaming",
            TickOutcome::Evaluated { verdict, .. } if verdict.healthy() => "healthy",
            TickOutcome::Evaluated { .. } => "unhealthy",
        }
    }
}

/// The health monitor loop.
///
/// Owns the cursor memory; nothing else reads or writes it. OBS is reached
/// through the shared [`BroadcastControl`] handle. The memory is tied to the
/// session it was read from and is dropped when that session is replaced,
/// even if another caller did the reconnect.
pub struct StreamMonitor {
    control: Arc<dyn BroadcastControl>,
    settings: MonitorSettings,
    freeze: FreezeDetector,
    session_epoch: Option<u64>,
}

impl StreamMonitor {
    pub fn new(control: Arc<dyn BroadcastControl>, settings: MonitorSettings) -> Self {
        Self {
            control,
            settings,
            freeze: FreezeDetector::new(),
            session_epoch: None,
        }
    }

    /// Cursor remembered from the previous tick.
    pub fn last_cursor(&self) -> Option<f64> {
        self.freeze.last_cursor()
    }

    /// Run until a shutdown signal arrives.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_secs = self.settings.interval.as_secs_f64(),
            source = %self.settings.source_name,
            threshold_kbps = self.settings.bitrate_threshold_kbps,
            main_scene = %self.settings.main_scene,
            brb_scene = %self.settings.brb_scene,
            "Stream monitor starting"
        );

        loop {
            match self.tick().await {
                Ok(outcome) => metrics::record_tick(outcome.label()),
                Err(e) => {
                    match &e {
                        MonitorError::Connectivity(_) => tracing::error!(
                            error = %e,
                            "Cannot reach OBS WebSocket. Check host, port and password"
                        ),
                        _ => tracing::error!(
                            error = %e,
                            category = e.category(),
                            "Unexpected error in monitoring loop"
                        ),
                    }
                    metrics::record_monitor_error(e.category());
                    metrics::record_tick("error");
                }
            }

            tokio::select! {
                _ = time::sleep(self.settings.interval) => {}
                _ = shutdown.recv() => {
                    tracing::info!("Stream monitor received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Evaluate health once and switch scene if needed.
    ///
    /// A connectivity error clears the cursor memory before it is returned.
    pub async fn tick(&mut self) -> Result<TickOutcome, MonitorError> {
        let result = self.evaluate().await;
        if let Err(MonitorError::Connectivity(_)) = &result {
            self.freeze.reset();
        }
        result
    }

    async fn evaluate(&mut self) -> Result<TickOutcome, MonitorError> {
        if !self.control.is_connected() {
            self.freeze.reset();
            tracing::warn!("OBS disconnected, attempting to reconnect");
            if let Err(e) = self.control.connect().await {
                tracing::warn!(error = %e, "Reconnect to OBS failed");
            }
            return Ok(TickOutcome::Disconnected);
        }

        let status = self.control.stream_status().await?;
        if !status.active {
            tracing::info!("Stream is not active, monitoring paused");
            return Ok(TickOutcome::NotStreaming);
        }

        let mut verdict = Verdict::default();

        if let Some(reason) = evaluate_bitrate(status.bitrate_kbps, self.settings.bitrate_threshold_kbps) {
            tracing::warn!(
                bitrate_kbps = status.bitrate_kbps,
                threshold_kbps = self.settings.bitrate_threshold_kbps,
                "Low bitrate detected"
            );
            verdict.push(reason);
        }

        match self.control.media_cursor(&self.settings.source_name).await {
            Ok(cursor) => {
                self.track_session();
                match self.freeze.observe(cursor) {
                    CursorCheck::Advancing => {}
                    CursorCheck::Unavailable => {
                        tracing::warn!(source = %self.settings.source_name, "Media cursor unavailable");
                        verdict.push(UnhealthyReason::CursorUnavailable);
                    }
                    CursorCheck::Frozen(cursor) => {
                        tracing::warn!(
                            source = %self.settings.source_name,
                            cursor,
                            "Source appears frozen (cursor not moving)"
                        );
                        verdict.push(UnhealthyReason::CursorFrozen { cursor });
                    }
                }
            }
            Err(e) if e.is_connectivity() => return Err(MonitorError::Connectivity(e)),
            Err(e) => {
                let err = MonitorError::SignalQuery { signal: "media_cursor", source: e };
                tracing::error!(source = %self.settings.source_name, error = %err, "Failed to check source");
                metrics::record_monitor_error(err.category());
                verdict.push(UnhealthyReason::CursorUnavailable);
            }
        }

        let scene = self.control.current_scene().await?;
        let action = decide(verdict.healthy(), SceneKind::classify(&scene, &self.settings.brb_scene));

        match action {
            SceneAction::SwitchToBrb => {
                tracing::info!(reasons = ?verdict.reasons(), from = %scene, "Problem detected, switching to BRB scene");
                self.control.set_current_scene(&self.settings.brb_scene).await?;
                metrics::record_scene_switch(&self.settings.brb_scene);
            }
            SceneAction::SwitchToMain => {
                tracing::info!("Stream health restored, switching back to main scene");
                self.control.set_current_scene(&self.settings.main_scene).await?;
                metrics::record_scene_switch(&self.settings.main_scene);
            }
            SceneAction::Hold if verdict.healthy() => {
                tracing::info!(scene = %scene, bitrate_kbps = status.bitrate_kbps, "Stream OK");
            }
            SceneAction::Hold => {
                tracing::debug!(reasons = ?verdict.reasons(), "Still unhealthy, BRB scene already active");
            }
        }

        metrics::record_verdict(verdict.healthy(), status.bitrate_kbps);
        Ok(TickOutcome::Evaluated { verdict, scene, action })
    }

    /// Forget the remembered cursor if the session it came from is gone.
    fn track_session(&mut self) {
        let epoch = self.control.session_epoch();
        if self.session_epoch.is_some_and(|seen| seen != epoch) {
            tracing::info!("OBS session was reopened since the last reading, clearing cursor memory");
            self.freeze.reset();
        }
        self.session_epoch = Some(epoch);
    }
}
