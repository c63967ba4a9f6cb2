use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Author of a conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
}

impl Role {
    /// Lowercase wire name (`user`, `assistant`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Tool => "tool",
        }
    }

    /// Human-facing label used by the exporters
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
            Role::System => "System",
            Role::Tool => "Tool",
        }
    }

    /// System and tool records are hidden outside the full view
    pub fn is_noise(&self) -> bool {
        matches!(self, Role::System | Role::Tool)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream marker separating interim reasoning from a final reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Thinking,
    Final,
}

/// One raw conversational turn as received from the backend.
///
/// `raw_content` is deliberately untyped: depending on the producer it is a plain
/// string, an object with a `content` field, an array of content parts, or an
/// object carrying only `text`. See [`crate::content`] for how it is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RecordFields")]
pub struct Record {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub role: Role,
    pub raw_content: Value,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageKind>,
}

/// Wire shape of a [`Record`]. `kind` and `isThinking` are read independently and
/// reconciled in the conversion, so a record carrying both still decodes.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordFields {
    id: String,
    #[serde(default)]
    parent_id: Option<String>,
    role: Role,
    #[serde(default, alias = "content")]
    raw_content: Value,
    #[serde(deserialize_with = "crate::parsers::deserializers::deserialize_timestamp")]
    timestamp: DateTime<Utc>,
    #[serde(default)]
    thread_id: Option<String>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_message_kind")]
    kind: Option<MessageKind>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_message_kind")]
    is_thinking: Option<MessageKind>,
}

impl From<RecordFields> for Record {
    fn from(fields: RecordFields) -> Self {
        let kind = match (fields.kind, fields.is_thinking) {
            (Some(kind), Some(flag)) if kind != flag => {
                // Disagreeing markers: let the heuristic decide
                warn!(record = %fields.id, "Conflicting kind and isThinking markers, ignoring both");
                None
            }
            (kind, flag) => kind.or(flag),
        };

        Self {
            id: fields.id,
            parent_id: fields.parent_id,
            role: fields.role,
            raw_content: fields.raw_content,
            timestamp: fields.timestamp,
            thread_id: fields.thread_id,
            kind,
        }
    }
}

impl Record {
    pub fn new(
        id: impl Into<String>,
        role: Role,
        raw_content: impl Into<Value>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            role,
            raw_content: raw_content.into(),
            timestamp,
            thread_id: None,
            kind: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserializes_camel_case_fields() {
        let json = r#"{
            "id": "m2",
            "parentId": "m1",
            "role": "assistant",
            "rawContent": {"content": [{"type": "text", "text": "Hi"}]},
            "timestamp": "2025-03-01T10:00:00Z",
            "threadId": "t-1"
        }"#;

        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "m2");
        assert_eq!(record.parent_id.as_deref(), Some("m1"));
        assert_eq!(record.role, Role::Assistant);
        assert_eq!(record.thread_id.as_deref(), Some("t-1"));
        assert!(record.kind.is_none());
    }

    #[test]
    fn test_record_accepts_content_alias_and_thinking_flag() {
        let json = r#"{"id":"a","role":"assistant","content":"...","timestamp":1700000000000,"isThinking":true}"#;

        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.raw_content, Value::String("...".to_string()));
        assert_eq!(record.kind, Some(MessageKind::Thinking));
    }

    #[test]
    fn test_record_reconciles_kind_and_thinking_flag() {
        let decode = |markers: &str| {
            let json = format!(
                r#"{{"id":"a","role":"assistant","content":"x","timestamp":1,{}}}"#,
                markers
            );
            serde_json::from_str::<Record>(&json).unwrap().kind
        };

        assert_eq!(decode(r#""kind":"thinking","isThinking":true"#), Some(MessageKind::Thinking));
        assert_eq!(decode(r#""kind":"final","isThinking":null"#), Some(MessageKind::Final));
        assert_eq!(decode(r#""kind":"final","isThinking":true"#), None);
    }

    #[test]
    fn test_serialized_record_decodes_back() {
        let record = Record::new("a", Role::Assistant, "x", DateTime::from_timestamp_millis(5).unwrap())
            .with_parent("q")
            .with_kind(MessageKind::Thinking);

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""kind":"thinking""#));
        assert_eq!(serde_json::from_str::<Record>(&json).unwrap(), record);
    }

    #[test]
    fn test_record_rejects_unknown_role() {
        let json = r#"{"id":"a","role":"narrator","content":"x","timestamp":1}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(Role::User.label(), "User");
        assert_eq!(Role::Assistant.to_string(), "assistant");
        assert!(Role::Tool.is_noise());
        assert!(!Role::User.is_noise());
    }
}
