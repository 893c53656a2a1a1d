//! Integration tests for concurrent probe fan-out
//!
//! Verifies that a hanging endpoint is bounded by its own timeout and cannot
//! block or drop the results of the other endpoints in a sweep.

use std::str::FromStr;
use std::time::{Duration, Instant};
use switchboard::{
    config::Config,
    health::{HttpProber, Probe},
    registry::{EndpointDraft, EndpointKind, EndpointRegistry},
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn draft(name: &str, base_url: &str, kind: EndpointKind) -> EndpointDraft {
    EndpointDraft {
        name: name.to_string(),
        base_url: base_url.to_string(),
        kind,
        model: match kind {
            EndpointKind::ModelRunner => Some("llama3".to_string()),
            EndpointKind::AiCore => None,
        },
        description: String::new(),
    }
}

#[tokio::test]
async fn test_hanging_endpoint_does_not_drop_other_results() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut registry = EndpointRegistry::open(dir.path()).unwrap();

    let hanging = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&hanging)
        .await;

    let fast = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&fast)
        .await;

    let refused = "http://127.0.0.1:1"; // nothing listens here

    let hang_id = registry
        .create(draft("hangs", &hanging.uri(), EndpointKind::AiCore))
        .unwrap()
        .id();
    let fast_id = registry
        .create(draft("fast", &fast.uri(), EndpointKind::AiCore))
        .unwrap()
        .id();
    let refused_id = registry
        .create(draft("refused", refused, EndpointKind::AiCore))
        .unwrap()
        .id();

    let prober = HttpProber::new(Duration::from_secs(1)).unwrap();
    let start = Instant::now();
    let results = prober.probe_all(registry.list()).await;

    // All three results are present, and the sweep is bounded by the probe
    // timeout, not the hanging endpoint's 10s delay.
    assert_eq!(results.len(), 3);
    assert!(start.elapsed() < Duration::from_secs(5));

    let by_id = |id| results.iter().find(|r| r.endpoint_id == id).unwrap();

    let hung = by_id(hang_id);
    assert!(!hung.healthy);
    assert!(hung.message.as_deref().unwrap().contains("timed out"));

    let ok = by_id(fast_id);
    assert!(ok.healthy);
    assert!(ok.latency_ms.is_some());

    let dead = by_id(refused_id);
    assert!(!dead.healthy);
    assert!(dead.latency_ms.is_none());
}

#[tokio::test]
async fn test_model_runner_probed_on_tags_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut registry = EndpointRegistry::open(dir.path()).unwrap();

    let runner = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"models":[]}"#))
        .mount(&runner)
        .await;

    registry
        .create(draft("runner", &runner.uri(), EndpointKind::ModelRunner))
        .unwrap();

    let prober = HttpProber::new(Duration::from_secs(1)).unwrap();
    let results = prober.probe_all(registry.list()).await;

    assert_eq!(results.len(), 1);
    assert!(results[0].healthy);
}

#[tokio::test]
async fn test_non_success_status_is_offline_with_diagnostic() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut registry = EndpointRegistry::open(dir.path()).unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    registry
        .create(draft("degraded", &server.uri(), EndpointKind::AiCore))
        .unwrap();

    let prober = HttpProber::new(Duration::from_secs(1)).unwrap();
    let results = prober.probe_all(registry.list()).await;

    assert!(!results[0].healthy);
    assert!(results[0].message.as_deref().unwrap().contains("503"));
}

#[tokio::test]
async fn test_probe_all_over_empty_registry_is_empty() {
    let prober = HttpProber::new(Duration::from_secs(1)).unwrap();
    let results = prober.probe_all(&[]).await;
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_probe_timeout_comes_from_config() {
    let toml = r#"
[server]
host = "127.0.0.1"
port = 3300

[probe]
timeout_seconds = 1
interval_seconds = 5
"#;
    let config = Config::from_str(toml).unwrap();
    assert_eq!(config.probe.timeout(), Duration::from_secs(1));
}
