//! Broker relay handlers

use crate::error::AppResult;
use crate::handlers::AppState;
use crate::relay::{Envelope, InboundMessage, MessageKind};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Relay connection status
#[derive(Debug, Serialize)]
pub struct RelayStatus {
    pub connected: bool,
}

/// POST /api/relay/connect
pub async fn connect(State(state): State<AppState>) -> AppResult<Json<RelayStatus>> {
    state.relay().connect().await?;
    Ok(Json(RelayStatus { connected: true }))
}

/// POST /api/relay/disconnect
pub async fn disconnect(State(state): State<AppState>) -> AppResult<Json<RelayStatus>> {
    state.relay().disconnect().await?;
    Ok(Json(RelayStatus { connected: false }))
}

/// Publish request body
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    #[serde(default = "default_kind")]
    pub kind: MessageKind,
    pub content: String,
    #[serde(default)]
    pub meta: HashMap<String, Value>,
}

fn default_kind() -> MessageKind {
    MessageKind::User
}

/// POST /api/relay/publish
pub async fn publish(
    State(state): State<AppState>,
    Json(request): Json<PublishRequest>,
) -> AppResult<Json<Envelope>> {
    if request.content.trim().is_empty() {
        return Err(crate::error::AppError::Validation(
            "content must not be empty".to_string(),
        ));
    }

    let mut envelope = Envelope::new(request.kind, request.content);
    for (key, value) in request.meta {
        envelope = envelope.with_meta(key, value);
    }

    state.relay().publish(&envelope).await?;
    state.metrics().record_relay_publish();

    Ok(Json(envelope))
}

/// GET /api/relay/messages
///
/// Snapshot of buffered inbound messages, oldest first.
pub async fn messages(State(state): State<AppState>) -> Json<Vec<InboundMessage>> {
    Json(state.relay().recent())
}
