use serde_json::Value;

use crate::models::Role;

/// How [`extract`] should render content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Pretty-printed structural dump
    Raw,
    /// Best-effort human text
    #[default]
    Extracted,
}

/// Recognized content shapes. Classification happens in exactly one place
/// ([`classify`]); rendering dispatches on the variant.
#[derive(Debug, PartialEq)]
enum ContentShape<'a> {
    /// Array of parts, each possibly carrying `text`
    Parts(&'a [Value]),
    /// Document whose `content` is itself a string
    NestedText(&'a str),
    /// Document whose `content` is neither string nor array
    NestedOther(&'a Value),
    /// Assistant payload exposing a top-level `text`
    AssistantText(&'a str),
    /// Nothing recognizable
    Opaque,
}

/// Render `raw` according to `mode`. Pure: the same input always yields the same string.
pub fn extract(raw: &Value, role: Role, mode: ExtractMode) -> String {
    match mode {
        ExtractMode::Raw => render_raw(raw),
        ExtractMode::Extracted => extract_text(raw, role),
    }
}

/// Structural dump: strings verbatim, everything else pretty-printed JSON
pub fn render_raw(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Best-effort readable text for a message.
///
/// Plain strings come back with literal `\n` sequences turned into line breaks, unless the
/// string is itself a serialized document, in which case the document is read instead.
/// Missing content reads as empty text.
pub fn extract_text(raw: &Value, role: Role) -> String {
    match raw {
        Value::Null => String::new(),
        Value::String(s) => {
            if let Some(document) = parse_embedded_document(s)
                && let Some(text) = render_shape(classify(&document, role))
            {
                return text;
            }
            unescape_newlines(s)
        }
        other => render_shape(classify(other, role)).unwrap_or_else(|| other.to_string()),
    }
}

fn classify(value: &Value, role: Role) -> ContentShape<'_> {
    match value {
        Value::Object(map) => match map.get("content") {
            Some(Value::Array(parts)) => ContentShape::Parts(parts),
            Some(Value::String(text)) => ContentShape::NestedText(text),
            Some(other) => ContentShape::NestedOther(other),
            None => match map.get("text") {
                Some(Value::String(text)) if role == Role::Assistant => {
                    ContentShape::AssistantText(text)
                }
                _ => ContentShape::Opaque,
            },
        },
        // A bare parts array only counts when at least one part carries text
        Value::Array(parts) if parts.iter().any(|p| part_text(p).is_some()) => {
            ContentShape::Parts(parts)
        }
        _ => ContentShape::Opaque,
    }
}

fn render_shape(shape: ContentShape<'_>) -> Option<String> {
    match shape {
        ContentShape::Parts(parts) => {
            Some(parts.iter().filter_map(part_text).collect::<Vec<_>>().join("\n\n"))
        }
        ContentShape::NestedText(text) | ContentShape::AssistantText(text) => {
            Some(text.to_string())
        }
        ContentShape::NestedOther(value) => Some(value.to_string()),
        ContentShape::Opaque => None,
    }
}

fn part_text(part: &Value) -> Option<&str> {
    part.get("text").and_then(Value::as_str)
}

fn parse_embedded_document(s: &str) -> Option<Value> {
    let trimmed = s.trim();
    if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
        return None;
    }
    serde_json::from_str::<Value>(trimmed).ok().filter(Value::is_object)
}

fn unescape_newlines(s: &str) -> String {
    s.replace("\\n", "\n")
}
