//! Supervision of the monitor task.
//!
//! The monitor runs as its own tokio task. A panic inside it is caught at the
//! join handle and a fresh monitor (with empty cursor memory) is started after
//! a backoff delay. A clean exit or a shutdown signal ends supervision.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::lifecycle::Shutdown;
use crate::monitor::StreamMonitor;
use crate::observability::metrics;
use crate::resilience::backoff::Backoff;

/// A monitor that ran this long before panicking starts over at the base delay.
const STABLE_RUN: Duration = Duration::from_secs(60);

/// Spawn the supervisor. `make_monitor` builds a monitor for every (re)start.
pub fn spawn_supervised_monitor<F>(
    make_monitor: F,
    shutdown: Shutdown,
    backoff: Backoff,
) -> JoinHandle<()>
where
    F: FnMut() -> StreamMonitor + Send + 'static,
{
    tokio::spawn(supervise(make_monitor, shutdown, backoff))
}

async fn supervise<F>(mut make_monitor: F, shutdown: Shutdown, mut backoff: Backoff)
where
    F: FnMut() -> StreamMonitor + Send + 'static,
{
    let mut stop = shutdown.subscribe();

    loop {
        let monitor = make_monitor();
        let started = Instant::now();
        let handle = tokio::spawn(monitor.run(shutdown.subscribe()));

        match handle.await {
            Ok(()) => {
                tracing::info!("Stream monitor stopped");
                return;
            }
            Err(e) if e.is_panic() => {
                metrics::record_monitor_restart();
                if started.elapsed() >= STABLE_RUN {
                    backoff.reset();
                }
                let delay = backoff.next_delay();
                tracing::error!(
                    attempt = backoff.attempts(),
                    delay_ms = delay.as_millis() as u64,
                    "Stream monitor panicked, restarting"
                );

                tokio::select! {
                    _ = time::sleep(delay) => {}
                    _ = stop.recv() => {
                        tracing::info!("Shutdown during monitor restart backoff");
                        return;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stream monitor task cancelled");
                return;
            }
        }
    }
}
