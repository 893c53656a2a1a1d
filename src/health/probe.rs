//! Health probing for registered endpoints
//!
//! A probe is a single bounded-timeout HTTP request against an endpoint's
//! liveness path. Probes never fail as errors: every outcome, including
//! timeouts and transport failures, is captured as a `ProbeResult`.

use crate::error::{AppError, AppResult};
use crate::registry::{Endpoint, EndpointId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Cap on diagnostic text captured from a probe response body
const MAX_DIAGNOSTIC_LEN: usize = 200;

/// Outcome of a single health probe
///
/// Superseded, never merged: the next result for the same endpoint id
/// replaces this one wholesale in the health cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub endpoint_id: EndpointId,
    pub healthy: bool,
    /// Measured round-trip latency; present only for healthy results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    pub observed_at: DateTime<Utc>,
    /// Human-readable diagnostic (failure reason or status payload excerpt)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProbeResult {
    pub fn online(endpoint_id: EndpointId, latency_ms: u64, message: Option<String>) -> Self {
        Self {
            endpoint_id,
            healthy: true,
            latency_ms: Some(latency_ms),
            observed_at: Utc::now(),
            message,
        }
    }

    pub fn offline(endpoint_id: EndpointId, message: impl Into<String>) -> Self {
        Self {
            endpoint_id,
            healthy: false,
            latency_ms: None,
            observed_at: Utc::now(),
            message: Some(message.into()),
        }
    }
}

/// Probe seam for the sweep scheduler and handlers
///
/// `HttpProber` is the production implementation; tests inject scripted
/// probers to drive reconciliation deterministically.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Probe a single endpoint. Never returns an error: all failures are
    /// folded into an unhealthy `ProbeResult`.
    async fn probe_one(&self, endpoint: &Endpoint) -> ProbeResult;

    /// Probe every endpoint concurrently and wait for all to settle.
    ///
    /// One hanging endpoint cannot block or drop the others' results; the
    /// returned list always has one entry per input endpoint.
    async fn probe_all(&self, endpoints: &[Endpoint]) -> Vec<ProbeResult> {
        futures::future::join_all(endpoints.iter().map(|e| self.probe_one(e))).await
    }
}

/// HTTP prober with a bounded per-probe timeout
pub struct HttpProber {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build probe client: {e}")))?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl Probe for HttpProber {
    async fn probe_one(&self, endpoint: &Endpoint) -> ProbeResult {
        let url = endpoint.probe_url();
        let start = Instant::now();

        // The timeout is enforced here rather than on the client so each
        // probe's bound is independent of connection pooling behavior.
        let outcome = tokio::time::timeout(self.timeout, self.client.get(&url).send()).await;

        let result = match outcome {
            Ok(Ok(response)) if response.status().is_success() => {
                let latency_ms = start.elapsed().as_millis() as u64;
                let diagnostic = response
                    .text()
                    .await
                    .ok()
                    .map(|body| excerpt(&body))
                    .filter(|s| !s.is_empty());
                ProbeResult::online(endpoint.id(), latency_ms, diagnostic)
            }
            Ok(Ok(response)) => ProbeResult::offline(
                endpoint.id(),
                format!("unexpected status {}", response.status()),
            ),
            Ok(Err(e)) => ProbeResult::offline(endpoint.id(), e.to_string()),
            Err(_) => ProbeResult::offline(
                endpoint.id(),
                format!("timed out after {}s", self.timeout.as_secs()),
            ),
        };

        tracing::debug!(
            endpoint_id = %endpoint.id(),
            url = %url,
            healthy = result.healthy,
            latency_ms = result.latency_ms,
            "Probe completed"
        );

        result
    }
}

/// First line of a response body, truncated for cache storage
fn excerpt(body: &str) -> String {
    let line = body.lines().next().unwrap_or("").trim();
    line.chars().take(MAX_DIAGNOSTIC_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_online_result_carries_latency() {
        let result = ProbeResult::online(EndpointId::new(1), 42, None);
        assert!(result.healthy);
        assert_eq!(result.latency_ms, Some(42));
        assert!(result.message.is_none());
    }

    #[test]
    fn test_offline_result_has_message_and_no_latency() {
        let result = ProbeResult::offline(EndpointId::new(1), "connection refused");
        assert!(!result.healthy);
        assert_eq!(result.latency_ms, None);
        assert_eq!(result.message.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_latency_omitted_from_serialized_offline_result() {
        let result = ProbeResult::offline(EndpointId::new(3), "down");
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("latency_ms"));
        assert!(json.contains("down"));
    }

    #[test]
    fn test_excerpt_takes_first_line_and_truncates() {
        assert_eq!(excerpt("OK\nsecond line"), "OK");
        assert_eq!(excerpt("  padded  "), "padded");

        let long = "x".repeat(500);
        assert_eq!(excerpt(&long).len(), MAX_DIAGNOSTIC_LEN);
    }
}
