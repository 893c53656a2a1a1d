//! Endpoint CRUD and manual probe handlers

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::health::{Probe, ProbeResult};
use crate::registry::{Endpoint, EndpointDraft, EndpointId};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// GET /api/endpoints
///
/// Returns every registered endpoint in registration order.
pub async fn list(State(state): State<AppState>) -> Json<Vec<Endpoint>> {
    let registry = state.registry().read().await;
    Json(registry.list().to_vec())
}

/// POST /api/endpoints
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<EndpointDraft>,
) -> AppResult<(StatusCode, Json<Endpoint>)> {
    let mut registry = state.registry().write().await;
    let endpoint = registry.create(draft)?;
    Ok((StatusCode::CREATED, Json(endpoint)))
}

/// PUT /api/endpoints/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<EndpointDraft>,
) -> AppResult<Json<Endpoint>> {
    let mut registry = state.registry().write().await;
    let endpoint = registry.update(EndpointId::new(id), draft)?;
    Ok(Json(endpoint))
}

/// DELETE /api/endpoints/{id}
///
/// Removes the endpoint, its cached probe result, and any selection
/// referencing it.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let id = EndpointId::new(id);

    {
        let mut registry = state.registry().write().await;
        registry.delete(id)?;
    }
    state.dashboard().write().await.on_endpoint_deleted(id);

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/endpoints/{id}/probe
///
/// Probes one endpoint immediately and refreshes its cache entry. Manual
/// probes do not drive auto-selection; only full sweeps do.
pub async fn probe_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProbeResult>> {
    let id = EndpointId::new(id);

    let endpoint = {
        let registry = state.registry().read().await;
        registry
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("endpoint {id}")))?
    };

    let result = state.prober().probe_one(&endpoint).await;
    state
        .metrics()
        .record_probe(result.healthy.into(), result.latency_ms);
    state.dashboard().write().await.apply_single(result.clone());

    Ok(Json(result))
}
