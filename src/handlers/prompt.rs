//! System-prompt push handler
//!
//! Forwards a system prompt to an AI-core endpoint's own
//! `/api/system-prompt` route and relays the downstream JSON reply.

use crate::error::{AppError, AppResult};
use crate::handlers::AppState;
use crate::health::SelectionTarget;
use crate::registry::EndpointId;
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

/// System-prompt push request
///
/// `endpoint_id` is optional; when omitted, the current chat-target selection
/// is used.
#[derive(Debug, Deserialize)]
pub struct SystemPromptRequest {
    pub endpoint_id: Option<i64>,
    pub system_prompt: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Payload forwarded downstream
#[derive(Debug, Serialize)]
struct DownstreamPrompt<'a> {
    system_prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
}

/// POST /api/system-prompt
pub async fn send(
    State(state): State<AppState>,
    Json(request): Json<SystemPromptRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if request.system_prompt.trim().is_empty() {
        return Err(AppError::Validation(
            "system_prompt must not be empty".to_string(),
        ));
    }

    let id = match request.endpoint_id {
        Some(raw) => EndpointId::new(raw),
        None => {
            let dashboard = state.dashboard().read().await;
            dashboard
                .selection()
                .get(SelectionTarget::Chat)
                .ok_or_else(|| {
                    AppError::Validation(
                        "no endpoint_id given and no chat target selected".to_string(),
                    )
                })?
        }
    };

    let endpoint = {
        let registry = state.registry().read().await;
        registry
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("endpoint {id}")))?
    };

    let url = format!(
        "{}/api/system-prompt",
        endpoint.base_url().trim_end_matches('/')
    );
    let payload = DownstreamPrompt {
        system_prompt: request.system_prompt.trim(),
        session_id: request.session_id.as_deref(),
    };

    tracing::info!(endpoint_id = %id, url = %url, "Pushing system prompt");

    let response = state
        .http()
        .post(&url)
        .json(&payload)
        .send()
        .await
        .map_err(|e| AppError::Upstream {
            endpoint: endpoint.base_url().to_string(),
            reason: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(AppError::Upstream {
            endpoint: endpoint.base_url().to_string(),
            reason: format!("unexpected status {}", response.status()),
        });
    }

    let body = response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| AppError::Upstream {
            endpoint: endpoint.base_url().to_string(),
            reason: format!("invalid JSON reply: {e}"),
        })?;

    Ok(Json(body))
}
