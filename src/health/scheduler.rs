//! Periodic sweep scheduler
//!
//! Owns the background task that probes every registered endpoint on a fixed
//! interval and reconciles the results into the dashboard state. At most one
//! timer task exists at a time; each tick is independent, with no retry or
//! backoff, since probe failures are absorbed as offline results by the
//! prober's non-throwing contract.

use crate::health::dashboard::DashboardState;
use crate::health::probe::{Probe, ProbeResult};
use crate::metrics::Metrics;
use crate::registry::EndpointRegistry;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Cancellable fixed-interval sweep driver
pub struct SweepScheduler {
    registry: Arc<RwLock<EndpointRegistry>>,
    dashboard: Arc<RwLock<DashboardState>>,
    prober: Arc<dyn Probe>,
    metrics: Metrics,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SweepScheduler {
    pub fn new(
        registry: Arc<RwLock<EndpointRegistry>>,
        dashboard: Arc<RwLock<DashboardState>>,
        prober: Arc<dyn Probe>,
        metrics: Metrics,
    ) -> Self {
        Self {
            registry,
            dashboard,
            prober,
            metrics,
            handle: Mutex::new(None),
        }
    }

    /// Run one full sweep now and return the probe results
    ///
    /// The endpoint list is cloned out under a read lock before the fan-out,
    /// so no lock is held while probes are in flight. Results are applied
    /// under a single write lock, making the reconcile step atomic with
    /// respect to manual selection.
    pub async fn sweep_once(&self) -> Vec<ProbeResult> {
        Self::run_sweep(
            &self.registry,
            &self.dashboard,
            self.prober.as_ref(),
            &self.metrics,
        )
        .await
    }

    async fn run_sweep(
        registry: &RwLock<EndpointRegistry>,
        dashboard: &RwLock<DashboardState>,
        prober: &dyn Probe,
        metrics: &Metrics,
    ) -> Vec<ProbeResult> {
        let (endpoints, order) = {
            let registry = registry.read().await;
            (registry.list().to_vec(), registry.order())
        };

        let results = prober.probe_all(&endpoints).await;

        metrics.record_sweep();
        for result in &results {
            metrics.record_probe(result.healthy.into(), result.latency_ms);
        }

        let online = results.iter().filter(|r| r.healthy).count();
        tracing::debug!(
            probed = results.len(),
            online,
            "Sweep completed"
        );

        dashboard.write().await.apply_sweep(results.clone(), &order);
        results
    }

    /// Start the periodic timer
    ///
    /// If a timer is already running it is canceled first, so at most one
    /// timer task is ever active.
    pub fn start(&self, interval: Duration) {
        let registry = self.registry.clone();
        let dashboard = self.dashboard.clone();
        let prober = self.prober.clone();
        let metrics = self.metrics.clone();

        let task = tokio::spawn(async move {
            tracing::info!(interval_seconds = interval.as_secs(), "Sweep scheduler started");
            loop {
                tokio::time::sleep(interval).await;
                Self::run_sweep(&registry, &dashboard, prober.as_ref(), &metrics).await;
            }
        });

        let mut handle = self.handle.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = handle.replace(task) {
            previous.abort();
            tracing::debug!("Previous sweep timer canceled");
        }
    }

    /// Cancel the periodic timer if one is running
    pub fn stop(&self) {
        let mut handle = self.handle.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(task) = handle.take() {
            task.abort();
            tracing::info!("Sweep scheduler stopped");
        }
    }

    /// Whether a timer task is currently active
    pub fn is_running(&self) -> bool {
        let handle = self.handle.lock().unwrap_or_else(|e| e.into_inner());
        handle.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SweepScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
