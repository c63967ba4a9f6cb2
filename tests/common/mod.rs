//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for a temporary sessions directory plus a preferences file location
pub struct SessionDirBuilder {
    temp_dir: TempDir,
}

impl SessionDirBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("sessions")).expect("Failed to create sessions dir");
        Self { temp_dir }
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.temp_dir.path().join("sessions")
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.temp_dir.path().join("prefs.json")
    }

    /// Write `<id>.jsonl` with one record per line
    pub fn with_session(self, id: &str, records: &[RecordBuilder]) -> Self {
        let content = records.iter().map(|r| r.to_json()).collect::<Vec<_>>().join("\n");
        self.with_raw_session(id, &content)
    }

    pub fn with_raw_session(self, id: &str, content: &str) -> Self {
        let path = self.sessions_dir().join(format!("{}.jsonl", id));
        fs::write(path, content).expect("Failed to write session file");
        self
    }

    pub fn session_path(&self, id: &str) -> PathBuf {
        self.sessions_dir().join(format!("{}.jsonl", id))
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for SessionDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for one JSONL record line
#[derive(Clone)]
pub struct RecordBuilder {
    id: String,
    parent_id: Option<String>,
    role: String,
    content: Value,
    timestamp_ms: i64,
    thread_id: Option<String>,
    kind: Option<String>,
}

impl RecordBuilder {
    pub fn new(id: &str, role: &str) -> Self {
        Self {
            id: id.to_string(),
            parent_id: None,
            role: role.to_string(),
            content: Value::String(format!("message {}", id)),
            timestamp_ms: 1_700_000_000_000,
            thread_id: None,
            kind: None,
        }
    }

    pub fn user(id: &str) -> Self {
        Self::new(id, "user")
    }

    pub fn assistant(id: &str) -> Self {
        Self::new(id, "assistant")
    }

    pub fn parent(mut self, parent_id: &str) -> Self {
        self.parent_id = Some(parent_id.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.content = Value::String(text.to_string());
        self
    }

    pub fn content(mut self, content: Value) -> Self {
        self.content = content;
        self
    }

    pub fn at_secs(mut self, secs: i64) -> Self {
        self.timestamp_ms = 1_700_000_000_000 + secs * 1000;
        self
    }

    pub fn thread(mut self, thread_id: &str) -> Self {
        self.thread_id = Some(thread_id.to_string());
        self
    }

    pub fn thinking(mut self) -> Self {
        self.kind = Some("thinking".to_string());
        self
    }

    pub fn to_json(&self) -> String {
        let mut value = json!({
            "id": self.id,
            "role": self.role,
            "content": self.content,
            "timestamp": self.timestamp_ms,
        });
        if let Some(parent) = &self.parent_id {
            value["parentId"] = json!(parent);
        }
        if let Some(thread) = &self.thread_id {
            value["threadId"] = json!(thread);
        }
        if let Some(kind) = &self.kind {
            value["kind"] = json!(kind);
        }
        value.to_string()
    }
}

/// Tool-use content part invoking `Write` on `path`
pub fn write_tool(path: &str, body: &str) -> Value {
    json!({"type": "tool_use", "name": "Write", "input": {"file_path": path, "content": body}})
}

/// Tool-use content part invoking `Edit` on `path`
pub fn edit_tool(path: &str, old: &str, new: &str) -> Value {
    json!({
        "type": "tool_use",
        "name": "Edit",
        "input": {"file_path": path, "old_string": old, "new_string": new}
    })
}

/// A short coding session: question, interim reasoning, a tool call, the answer, a follow-up
pub fn coding_session() -> Vec<RecordBuilder> {
    vec![
        RecordBuilder::user("q1").text("Add a greeting to main.rs").at_secs(0),
        RecordBuilder::assistant("think").parent("q1").text("Let me look").thinking().at_secs(1),
        RecordBuilder::new("sys", "system").parent("think").text("tool ran").at_secs(2),
        RecordBuilder::assistant("a1")
            .parent("sys")
            .content(json!({"content": [
                {"type": "text", "text": "Added the greeting."},
                write_tool("src/main.rs", "fn main() {\n    println!(\"hi\");\n}")
            ]}))
            .at_secs(3),
        RecordBuilder::user("q2").parent("a1").text("Thanks, now rename it").at_secs(4),
    ]
}
