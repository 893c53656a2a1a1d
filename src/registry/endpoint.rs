//! Endpoint identity and configuration types
//!
//! An endpoint is a registered external AI service: either an AI-core HTTP
//! service or an Ollama-style model runner. Identity is a stable numeric id
//! assigned at creation and never reused within a registry file.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Stable identifier for a registered endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointId(i64);

impl EndpointId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for EndpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of service behind an endpoint
///
/// The kind determines which liveness path a health probe hits:
/// AI-core services expose `/health`, model runners answer `/api/tags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointKind {
    AiCore,
    ModelRunner,
}

impl EndpointKind {
    /// Path appended to the endpoint base URL for health probes
    pub fn health_path(&self) -> &'static str {
        match self {
            EndpointKind::AiCore => "/health",
            EndpointKind::ModelRunner => "/api/tags",
        }
    }
}

/// A registered endpoint
///
/// Fields are private to enforce invariants: instances are constructed by the
/// registry (which assigns ids) or deserialized from a registry file that the
/// registry validated on write. `id` never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    id: EndpointId,
    name: String,
    base_url: String,
    kind: EndpointKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(default)]
    description: String,
}

impl Endpoint {
    pub(crate) fn from_parts(id: EndpointId, draft: EndpointDraft) -> Self {
        Self {
            id,
            name: draft.name,
            base_url: draft.base_url,
            kind: draft.kind,
            model: draft.model,
            description: draft.description,
        }
    }

    /// Apply a validated draft over this endpoint, keeping the id
    pub(crate) fn apply(&mut self, draft: EndpointDraft) {
        self.name = draft.name;
        self.base_url = draft.base_url;
        self.kind = draft.kind;
        self.model = draft.model;
        self.description = draft.description;
    }

    pub fn id(&self) -> EndpointId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn kind(&self) -> EndpointKind {
        self.kind
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Full URL of this endpoint's health probe target
    pub fn probe_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.kind.health_path()
        )
    }
}

/// Incoming endpoint payload for create/update requests
///
/// Validated with `validate()` before any registry mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointDraft {
    pub name: String,
    pub base_url: String,
    pub kind: EndpointKind,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl EndpointDraft {
    /// Validate required fields before any store mutation
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation(
                "endpoint name must not be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(AppError::Validation(format!(
                "endpoint base_url '{}' must start with 'http://' or 'https://'",
                self.base_url
            )));
        }

        if self.kind == EndpointKind::ModelRunner
            && self.model.as_deref().is_none_or(|m| m.trim().is_empty())
        {
            return Err(AppError::Validation(
                "model-runner endpoints require a model name".to_string(),
            ));
        }

        Ok(())
    }
}
