use chrono::{DateTime, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::models::MessageKind;

/// Custom deserializer for timestamp that accepts both integers (ms) and RFC3339 strings
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => {
            // Assume it's a Unix timestamp in milliseconds
            let ms = n.as_i64().ok_or_else(|| Error::custom("invalid timestamp"))?;
            DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| Error::custom("timestamp out of range"))
        }
        Value::String(s) => s
            .parse::<DateTime<Utc>>()
            .map_err(|e| Error::custom(format!("invalid RFC3339 timestamp: {}", e))),
        _ => Err(Error::custom("timestamp must be a number or string")),
    }
}

/// Interim/final marker: accepts `"thinking"`/`"final"` (plus a few synonyms) or a boolean
/// `isThinking` flag. `null` means the producer did not classify the record.
///
/// The marker is only a classification hint, so unrecognized values decode as `None` with a
/// warning instead of failing the whole record.
pub fn deserialize_message_kind<'de, D>(deserializer: D) -> Result<Option<MessageKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let kind = match &value {
        Value::Null => None,
        Value::Bool(true) => Some(MessageKind::Thinking),
        Value::Bool(false) => Some(MessageKind::Final),
        Value::String(s) => match s.to_lowercase().as_str() {
            "thinking" | "interim" | "reasoning" => Some(MessageKind::Thinking),
            "final" | "reply" | "answer" => Some(MessageKind::Final),
            _ => {
                warn!(value = %value, "Unknown message kind, falling back to content heuristic");
                None
            }
        },
        _ => {
            warn!(value = %value, "Message kind must be a string or boolean, ignoring it");
            None
        }
    };
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use crate::models::{MessageKind, Record, Role};

    #[test]
    fn test_record_timestamp_integer() {
        let json = r#"{"id":"a","role":"user","content":"hi","timestamp":1762076480016}"#;

        let record: Record = serde_json::from_str(json).unwrap();

        // Nov 2, 2025 09:41:20 UTC
        let expected_ts = DateTime::from_timestamp_millis(1762076480016).unwrap();
        assert_eq!(record.timestamp, expected_ts);
    }

    #[test]
    fn test_record_timestamp_rfc3339() {
        let json = r#"{"id":"a","role":"user","content":"hi","timestamp":"2025-11-02T09:41:20.016Z"}"#;

        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.timestamp, DateTime::from_timestamp_millis(1762076480016).unwrap());
        assert_eq!(record.role, Role::User);
    }

    #[test]
    fn test_record_timestamp_invalid() {
        let json = r#"{"id":"a","role":"user","content":"hi","timestamp":"yesterday"}"#;
        let err = serde_json::from_str::<Record>(json).unwrap_err();
        assert!(err.to_string().contains("invalid RFC3339 timestamp"));
    }

    #[test]
    fn test_message_kind_variants() {
        let marked = |raw: &str| {
            let json = format!(
                r#"{{"id":"a","role":"assistant","content":"x","timestamp":1,"kind":{}}}"#,
                raw
            );
            serde_json::from_str::<Record>(&json).map(|r| r.kind)
        };

        assert_eq!(marked(r#""thinking""#).unwrap(), Some(MessageKind::Thinking));
        assert_eq!(marked(r#""FINAL""#).unwrap(), Some(MessageKind::Final));
        assert_eq!(marked("false").unwrap(), Some(MessageKind::Final));
        assert_eq!(marked("null").unwrap(), None);
        assert_eq!(marked(r#""maybe""#).unwrap(), None);
        assert_eq!(marked("3").unwrap(), None);
    }
}
