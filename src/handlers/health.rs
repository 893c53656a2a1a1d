//! Health check endpoint
//!
//! Provides a simple health check for monitoring and load balancers. This is
//! the service's own liveness route, distinct from the endpoint probes it
//! runs against registered AI services.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::handlers::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Whether the background sweep scheduler is ticking
    pub scheduler: &'static str,
}

/// Health check handler
///
/// Returns 200 OK with the sweep scheduler's liveness, so an operator can
/// tell a paused dashboard from a dead one.
pub async fn handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let scheduler = if state.scheduler().is_running() {
        "running"
    } else {
        "stopped"
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "OK",
            scheduler,
        }),
    )
}
