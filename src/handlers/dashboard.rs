//! Dashboard snapshot, sweep, and selection handlers
//!
//! The snapshot is the read surface the presentation layer polls: endpoint
//! rows joined with their cached probe results, plus the selection state and
//! scheduler liveness.

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::health::{ProbeResult, SelectionState, SelectionTarget};
use crate::registry::{Endpoint, EndpointId};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

/// One dashboard row: an endpoint and its most recent probe result (if any)
#[derive(Debug, Serialize)]
pub struct EndpointStatusRow {
    #[serde(flatten)]
    pub endpoint: Endpoint,
    pub probe: Option<ProbeResult>,
}

/// Full dashboard snapshot
#[derive(Debug, Serialize)]
pub struct DashboardSnapshot {
    pub endpoints: Vec<EndpointStatusRow>,
    pub selection: SelectionState,
    pub scheduler_running: bool,
}

/// GET /api/dashboard
pub async fn snapshot(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    let endpoints: Vec<Endpoint> = {
        let registry = state.registry().read().await;
        registry.list().to_vec()
    };

    let dashboard = state.dashboard().read().await;
    let rows = endpoints
        .into_iter()
        .map(|endpoint| {
            let probe = dashboard.cached(endpoint.id()).cloned();
            EndpointStatusRow { endpoint, probe }
        })
        .collect();

    Json(DashboardSnapshot {
        endpoints: rows,
        selection: dashboard.selection(),
        scheduler_running: state.scheduler().is_running(),
    })
}

/// POST /api/sweep
///
/// Runs a full probe sweep immediately and returns the fresh results.
pub async fn sweep(State(state): State<AppState>) -> Json<Vec<ProbeResult>> {
    Json(state.scheduler().sweep_once().await)
}

/// Selection request body
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub endpoint_id: i64,
}

/// PUT /api/selection/{target}
///
/// Explicit user selection: validates the endpoint still exists, then sets
/// the slot and disarms that target's auto-select flag.
pub async fn select(
    State(state): State<AppState>,
    Path(target): Path<String>,
    Json(request): Json<SelectRequest>,
) -> AppResult<Json<SelectionState>> {
    let target: SelectionTarget = target.parse()?;
    let id = EndpointId::new(request.endpoint_id);

    {
        let registry = state.registry().read().await;
        if !registry.contains(id) {
            return Err(AppError::NotFound(format!("endpoint {id}")));
        }
    }

    let mut dashboard = state.dashboard().write().await;
    dashboard.select(target, id);
    Ok(Json(dashboard.selection()))
}

/// DELETE /api/selection/{target}
pub async fn clear(
    State(state): State<AppState>,
    Path(target): Path<String>,
) -> AppResult<StatusCode> {
    let target: SelectionTarget = target.parse()?;
    state.dashboard().write().await.clear(target);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/selection/reload
///
/// Re-arms auto-selection for both slots and runs a sweep so the reconciler
/// can pick a fresh default immediately.
pub async fn reload(State(state): State<AppState>) -> Json<SelectionState> {
    state.dashboard().write().await.rearm();
    state.scheduler().sweep_once().await;
    let dashboard = state.dashboard().read().await;
    Json(dashboard.selection())
}
