//! Prometheus metrics endpoint

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::handlers::AppState;

/// GET /metrics
///
/// Renders all registered metrics in Prometheus text exposition format.
pub async fn handler(State(state): State<AppState>) -> impl IntoResponse {
    let body = state.metrics().export();
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        body,
    )
}
