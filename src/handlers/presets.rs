//! Message preset CRUD handlers

use crate::error::AppResult;
use crate::handlers::AppState;
use crate::presets::{MessagePreset, PresetDraft};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// GET /api/presets
pub async fn list(State(state): State<AppState>) -> Json<Vec<MessagePreset>> {
    let presets = state.presets().read().await;
    Json(presets.list().to_vec())
}

/// POST /api/presets
pub async fn create(
    State(state): State<AppState>,
    Json(draft): Json<PresetDraft>,
) -> AppResult<(StatusCode, Json<MessagePreset>)> {
    let mut presets = state.presets().write().await;
    let preset = presets.create(draft)?;
    Ok((StatusCode::CREATED, Json(preset)))
}

/// PUT /api/presets/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(draft): Json<PresetDraft>,
) -> AppResult<Json<MessagePreset>> {
    let mut presets = state.presets().write().await;
    let preset = presets.update(id, draft)?;
    Ok(Json(preset))
}

/// DELETE /api/presets/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    let mut presets = state.presets().write().await;
    presets.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
