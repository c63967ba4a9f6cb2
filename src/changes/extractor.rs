use serde_json::{Map, Value};
use tracing::debug;

use crate::models::{ChangeType, CodeChangeInfo};
use crate::tree::MessageNode;

const PATH_KEYS: &[&str] = &["file_path", "filePath", "path"];
const CONTENT_KEYS: &[&str] = &["content", "file_text", "new_content", "newContent"];
const OLD_TEXT_KEYS: &[&str] = &["old_string", "old_str", "oldText", "old_text"];
const NEW_TEXT_KEYS: &[&str] = &["new_string", "new_str", "newText", "new_text"];
const START_LINE_KEYS: &[&str] = &["start_line", "startLine"];
const END_LINE_KEYS: &[&str] = &["end_line", "endLine"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolKind {
    Write,
    Edit,
    MultiEdit,
    Delete,
}

impl ToolKind {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "write" | "create" | "write_file" | "create_file" => Some(ToolKind::Write),
            "edit" | "update" | "edit_file" | "str_replace" => Some(ToolKind::Edit),
            "multiedit" | "multi_edit" => Some(ToolKind::MultiEdit),
            "delete" | "delete_file" | "remove_file" => Some(ToolKind::Delete),
            _ => None,
        }
    }
}

/// Code changes for a node, reusing the node's cached extraction
pub fn extract_code_changes(node: &MessageNode) -> Vec<CodeChangeInfo> {
    node.code_changes().to_vec()
}

/// Scan raw message content for tool envelopes and convert the recognized ones
pub fn extract_changes_from_content(raw: &Value) -> Vec<CodeChangeInfo> {
    let mut changes = Vec::new();
    walk(raw, &mut changes);
    changes
}

fn walk(value: &Value, changes: &mut Vec<CodeChangeInfo>) {
    match value {
        Value::Object(map) => match envelope(map) {
            // An envelope's input is not searched for further envelopes
            Some((name, input)) => changes.extend(recognize(name, input)),
            None => map.values().for_each(|v| walk(v, changes)),
        },
        Value::Array(items) => items.iter().for_each(|v| walk(v, changes)),
        // Tool calls serialized into prose, e.g. plain-string content
        Value::String(text) => scan_text(text, changes),
        _ => {}
    }
}

fn envelope(map: &Map<String, Value>) -> Option<(&str, &Map<String, Value>)> {
    let name = map.get("name")?.as_str()?;
    let input = map.get("input")?.as_object()?;
    Some((name, input))
}

/// Find JSON objects embedded in free text and walk each one that parses
fn scan_text(text: &str, changes: &mut Vec<CodeChangeInfo>) {
    let mut offset = 0;

    while let Some(pos) = text[offset..].find('{') {
        let start = offset + pos;
        let candidate = &text[start..];
        let mut stream = serde_json::Deserializer::from_str(candidate).into_iter::<Value>();

        match stream.next() {
            Some(Ok(value)) => {
                walk(&value, changes);
                // Resume after the parsed object so its inner braces are not scanned again
                offset = start + stream.byte_offset().max(1);
            }
            Some(Err(e)) => {
                // Most stray braces are prose, only log the ones shaped like tool calls
                if looks_like_envelope(candidate) {
                    debug!("Skipping malformed tool envelope: {}", e);
                }
                offset = start + 1;
            }
            None => break,
        }
    }
}

fn looks_like_envelope(candidate: &str) -> bool {
    // chars() keeps the cut on a UTF-8 boundary
    let head: String = candidate.chars().take(200).collect();
    head.contains("\"name\"") && head.contains("\"input\"")
}

fn recognize(name: &str, input: &Map<String, Value>) -> Vec<CodeChangeInfo> {
    let Some(kind) = ToolKind::from_name(name) else {
        return Vec::new();
    };

    match kind {
        ToolKind::Write => write_change(name, input).into_iter().collect(),
        ToolKind::Edit => edit_change(name, input, input).into_iter().collect(),
        ToolKind::MultiEdit => input
            .get("edits")
            .and_then(Value::as_array)
            // One update per edit; entries without texts are dropped
            .map(|edits| {
                edits
                    .iter()
                    .filter_map(Value::as_object)
                    .filter_map(|edit| edit_change(name, input, edit))
                    .collect()
            })
            .unwrap_or_default(),
        ToolKind::Delete => delete_change(name, input).into_iter().collect(),
    }
}

fn write_change(tool_name: &str, input: &Map<String, Value>) -> Option<CodeChangeInfo> {
    let file_path = string_field(input, PATH_KEYS)?;
    let content = string_field(input, CONTENT_KEYS)?;

    Some(CodeChangeInfo {
        file_path: file_path.to_string(),
        change_type: ChangeType::Create,
        old_text: None,
        new_text: Some(content.to_string()),
        lines_added: Some(count_lines(content)),
        lines_removed: None,
        start_line: None,
        end_line: None,
        tool_name: tool_name.to_string(),
    })
}

/// `input` supplies the file path, `edit` the texts and line range (the same map
/// for single edits, one entry of `edits` for multi-edits)
fn edit_change(
    tool_name: &str,
    input: &Map<String, Value>,
    edit: &Map<String, Value>,
) -> Option<CodeChangeInfo> {
    let file_path = string_field(input, PATH_KEYS)?;
    let old_text = string_field(edit, OLD_TEXT_KEYS);
    let new_text = string_field(edit, NEW_TEXT_KEYS);
    // A path alone says nothing about what changed
    if old_text.is_none() && new_text.is_none() {
        return None;
    }

    Some(CodeChangeInfo {
        file_path: file_path.to_string(),
        change_type: ChangeType::Update,
        old_text: old_text.map(str::to_string),
        new_text: new_text.map(str::to_string),
        lines_added: Some(new_text.map(count_lines).unwrap_or(0)),
        lines_removed: Some(old_text.map(count_lines).unwrap_or(0)),
        start_line: number_field(edit, START_LINE_KEYS),
        end_line: number_field(edit, END_LINE_KEYS),
        tool_name: tool_name.to_string(),
    })
}

fn delete_change(tool_name: &str, input: &Map<String, Value>) -> Option<CodeChangeInfo> {
    let file_path = string_field(input, PATH_KEYS)?;

    Some(CodeChangeInfo {
        file_path: file_path.to_string(),
        change_type: ChangeType::Delete,
        old_text: None,
        new_text: None,
        lines_added: None,
        lines_removed: None,
        start_line: None,
        end_line: None,
        tool_name: tool_name.to_string(),
    })
}

fn string_field<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| map.get(*key).and_then(Value::as_str))
}

fn number_field(map: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| map.get(*key).and_then(Value::as_u64))
}

fn count_lines(text: &str) -> usize {
    // A trailing newline does not start another line
    text.lines().count()
}
