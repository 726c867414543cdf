//! Periodic backend health polling.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::TransitApi;

/// Default interval between health checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Polls `/health` in the background and publishes the latest result.
///
/// The first check runs immediately. Transitions between healthy and
/// unhealthy are logged; steady state is not.
pub struct HealthMonitor {
    status: watch::Receiver<Option<bool>>,
    task: JoinHandle<()>,
}

impl HealthMonitor {
    /// Start polling with the given interval.
    ///
    /// A zero interval falls back to [`DEFAULT_POLL_INTERVAL`].
    pub fn spawn(api: TransitApi, interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            warn!(
                default_secs = DEFAULT_POLL_INTERVAL.as_secs(),
                "zero health poll interval; using default"
            );
            DEFAULT_POLL_INTERVAL
        } else {
            interval
        };
        let (tx, rx) = watch::channel(None);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let healthy = api.check_health().await;
                let previous = *tx.borrow();
                match (previous, healthy) {
                    (Some(true), false) | (None, false) => warn!("backend is unavailable"),
                    (Some(false), true) | (None, true) => info!("backend is healthy"),
                    _ => {}
                }
                if tx.send(Some(healthy)).is_err() {
                    // Every receiver is gone
                    break;
                }
            }
        });

        Self { status: rx, task }
    }

    /// Latest result; `None` until the first check completes.
    pub fn latest(&self) -> Option<bool> {
        *self.status.borrow()
    }

    /// Wait for the next check to complete and return its result.
    pub async fn next(&mut self) -> Option<bool> {
        self.status.changed().await.ok()?;
        *self.status.borrow_and_update()
    }

    /// Stop polling.
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ClientConfig;

    async fn unreachable_api() -> TransitApi {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ClientConfig::new(format!("http://{addr}/api")).without_proxy();
        TransitApi::new(config).unwrap()
    }

    #[tokio::test]
    async fn unreachable_backend_reports_unhealthy() {
        let mut monitor = HealthMonitor::spawn(unreachable_api().await, Duration::from_millis(50));
        assert_eq!(monitor.next().await, Some(false));
        assert_eq!(monitor.latest(), Some(false));
        monitor.stop();
    }

    #[tokio::test]
    async fn zero_interval_still_polls() {
        let mut monitor = HealthMonitor::spawn(unreachable_api().await, Duration::ZERO);
        assert_eq!(monitor.next().await, Some(false));
        assert_eq!(monitor.latest(), Some(false));
        monitor.stop();
    }
}
