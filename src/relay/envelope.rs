//! Chat envelope wire format
//!
//! The relay forwards opaque envelopes: a kind tag, the message text, and a
//! metadata block with a schema version and timestamp. Transport concerns
//! (framing, retry, ordering) belong to the broker client, not the envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

const SCHEMA_VERSION: &str = "v0";

/// Envelope kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    System,
    User,
    Event,
}

/// Envelope metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub schema_version: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl Default for EnvelopeMeta {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            timestamp: Utc::now(),
            extra: HashMap::new(),
        }
    }
}

/// A chat message envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    #[serde(default)]
    pub meta: EnvelopeMeta,
}

impl Envelope {
    pub fn new(kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            meta: EnvelopeMeta::default(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageKind::User, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageKind::System, content)
    }

    /// Attach an extra metadata field
    pub fn with_meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.meta.extra.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serializes_kind_as_type() {
        let envelope = Envelope::user("hello");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["type"], "user");
        assert_eq!(json["content"], "hello");
        assert_eq!(json["meta"]["schema_version"], "v0");
    }

    #[test]
    fn test_extra_meta_flattens() {
        let envelope =
            Envelope::system("be terse").with_meta("session_id", Value::from("abc-123"));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["meta"]["session_id"], "abc-123");
    }

    #[test]
    fn test_envelope_deserializes_without_meta() {
        let envelope: Envelope =
            serde_json::from_str(r#"{"type":"event","content":"ready"}"#).unwrap();
        assert_eq!(envelope.kind, MessageKind::Event);
        assert_eq!(envelope.meta.schema_version, "v0");
    }
}
