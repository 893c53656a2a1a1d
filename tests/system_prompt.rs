//! Integration tests for the system-prompt push

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use std::str::FromStr;
use switchboard::{
    config::Config,
    handlers::{self, AppState},
};
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_app(dir: &tempfile::TempDir) -> Router {
    let toml = format!(
        r#"
[server]
host = "127.0.0.1"
port = 3300
request_timeout_seconds = 2

[registry]
data_dir = "{}"

[probe]
interval_seconds = 3600
timeout_seconds = 1
"#,
        dir.path().display()
    );
    let config = Config::from_str(&toml).expect("should parse test config");
    let state = AppState::new(config).expect("should create AppState");
    handlers::app(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(json) => request.body(Body::from(json.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register(app: &Router, name: &str, base_url: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/endpoints",
        Some(serde_json::json!({
            "name": name,
            "base_url": base_url,
            "kind": "ai-core"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_push_to_explicit_endpoint() {
    let dir = tempfile::TempDir::new().unwrap();
    let app = test_app(&dir);

    let core = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/system-prompt"))
        .and(body_json(serde_json::json!({
            "system_prompt": "Be brief.",
            "session_id": "s-1"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "ok", "session_id": "s-1" })),
        )
        .expect(1)
        .mount(&core)
        .await;

    let id = register(&app, "core", &core.uri()).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/system-prompt",
        Some(serde_json::json!({
            "endpoint_id": id,
            "system_prompt": "Be brief.",
            "session_id": "s-1"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_push_uses_chat_selection_when_id_omitted() {
    let dir = tempfile::TempDir::new().unwrap();
    let app = test_app(&dir);

    let core = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&core)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/system-prompt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})))
        .expect(1)
        .mount(&core)
        .await;

    register(&app, "core", &core.uri()).await;

    // Sweep auto-selects the chat target; the push then resolves it.
    send(&app, "POST", "/api/sweep", None).await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/system-prompt",
        Some(serde_json::json!({ "system_prompt": "Be brief." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_push_without_selection_or_id_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(
        &app,
        "POST",
        "/api/system-prompt",
        Some(serde_json::json!({ "system_prompt": "Be brief." })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("chat target"));
}

#[tokio::test]
async fn test_push_empty_prompt_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, body) = send(
        &app,
        "POST",
        "/api/system-prompt",
        Some(serde_json::json!({ "endpoint_id": 1, "system_prompt": "  " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("system_prompt"));
}

#[tokio::test]
async fn test_push_to_unknown_endpoint_is_404() {
    let dir = tempfile::TempDir::new().unwrap();
    let app = test_app(&dir);

    let (status, _) = send(
        &app,
        "POST",
        "/api/system-prompt",
        Some(serde_json::json!({ "endpoint_id": 42, "system_prompt": "Be brief." })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_downstream_failure_surfaces_as_bad_gateway() {
    let dir = tempfile::TempDir::new().unwrap();
    let app = test_app(&dir);

    let core = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/system-prompt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&core)
        .await;

    let id = register(&app, "core", &core.uri()).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/system-prompt",
        Some(serde_json::json!({ "endpoint_id": id, "system_prompt": "Be brief." })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("500"));
}
