//! Prometheus metrics collection for Switchboard
//!
//! This module provides metrics instrumentation for tracking:
//! - Sweep executions and per-probe outcomes
//! - Probe round-trip latency
//! - Relay envelopes published
//!
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Probe outcome enum for type-safe metrics labels
///
/// Prevents cardinality explosion by restricting outcome values to
/// exactly two valid options at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Online,
    Offline,
}

impl ProbeOutcome {
    /// Convert outcome to Prometheus label string
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeOutcome::Online => "online",
            ProbeOutcome::Offline => "offline",
        }
    }
}

impl From<bool> for ProbeOutcome {
    fn from(healthy: bool) -> Self {
        if healthy {
            ProbeOutcome::Online
        } else {
            ProbeOutcome::Offline
        }
    }
}

/// Metrics collector for Switchboard
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    sweeps_total: IntCounter,
    probes_total: IntCounterVec,
    probe_latency_seconds: Histogram,
    relay_published_total: IntCounter,
}

impl Metrics {
    /// Create a new Metrics instance
    ///
    /// Registers all metrics with a new Prometheus registry.
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let sweeps_total = IntCounter::with_opts(Opts::new(
            "switchboard_sweeps_total",
            "Total number of full health sweeps executed",
        ))?;
        registry.register(Box::new(sweeps_total.clone()))?;

        let probes_total = IntCounterVec::new(
            Opts::new(
                "switchboard_probes_total",
                "Total number of endpoint probes by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(probes_total.clone()))?;

        let probe_latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "switchboard_probe_latency_seconds",
                "Round-trip latency of successful endpoint probes",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        )?;
        registry.register(Box::new(probe_latency_seconds.clone()))?;

        let relay_published_total = IntCounter::with_opts(Opts::new(
            "switchboard_relay_published_total",
            "Total number of envelopes published to the relay broker",
        ))?;
        registry.register(Box::new(relay_published_total.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            sweeps_total,
            probes_total,
            probe_latency_seconds,
            relay_published_total,
        })
    }

    /// Record a completed sweep
    pub fn record_sweep(&self) {
        self.sweeps_total.inc();
    }

    /// Record one probe outcome, including latency for healthy probes
    pub fn record_probe(&self, outcome: ProbeOutcome, latency_ms: Option<u64>) {
        self.probes_total
            .with_label_values(&[outcome.as_str()])
            .inc();
        if let Some(ms) = latency_ms {
            self.probe_latency_seconds.observe(ms as f64 / 1000.0);
        }
    }

    /// Record a relay publish
    pub fn record_relay_publish(&self) {
        self.relay_published_total.inc();
    }

    /// Render all metrics in Prometheus text exposition format
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new_registers_without_error() {
        let metrics = Metrics::new().expect("metrics should register");
        let export = metrics.export();
        assert!(export.contains("switchboard_sweeps_total"));
        assert!(export.contains("switchboard_probes_total"));
    }

    #[test]
    fn test_record_probe_increments_outcome_counter() {
        let metrics = Metrics::new().unwrap();

        metrics.record_probe(ProbeOutcome::Online, Some(12));
        metrics.record_probe(ProbeOutcome::Offline, None);
        metrics.record_probe(ProbeOutcome::Offline, None);

        let export = metrics.export();
        assert!(export.contains(r#"switchboard_probes_total{outcome="online"} 1"#));
        assert!(export.contains(r#"switchboard_probes_total{outcome="offline"} 2"#));
    }

    #[test]
    fn test_record_sweep_increments() {
        let metrics = Metrics::new().unwrap();
        metrics.record_sweep();
        metrics.record_sweep();

        let export = metrics.export();
        assert!(export.contains("switchboard_sweeps_total 2"));
    }

    #[test]
    fn test_probe_outcome_from_bool() {
        assert_eq!(ProbeOutcome::from(true), ProbeOutcome::Online);
        assert_eq!(ProbeOutcome::from(false), ProbeOutcome::Offline);
    }
}
