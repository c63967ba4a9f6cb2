use std::path::Path;

use serde::Serialize;

use crate::diff::{TruncationPolicy, truncate_diff};
use crate::models::{ChangeType, CodeChangeInfo};
use crate::tree::MessageNode;

/// A code change rendered for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlock {
    pub file_path: String,
    pub change_type: ChangeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<&'static str>,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines_added: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines_removed: Option<usize>,
    pub truncated: bool,
}

impl CodeBlock {
    /// One-line summary, e.g. `update src/main.rs (+3 -1)`
    pub fn summary(&self) -> String {
        let mut summary = format!("{} {}", self.change_type, self.file_path);
        match (self.lines_added, self.lines_removed) {
            (Some(added), Some(removed)) => summary.push_str(&format!(" (+{} -{})", added, removed)),
            (Some(added), None) => summary.push_str(&format!(" (+{})", added)),
            (None, Some(removed)) => summary.push_str(&format!(" (-{})", removed)),
            (None, None) => {}
        }
        summary
    }
}

/// Render every code change of `node`
pub fn code_blocks_for(node: &MessageNode, policy: &TruncationPolicy) -> Vec<CodeBlock> {
    node.code_changes().iter().map(|change| render_change(change, policy)).collect()
}

fn render_change(change: &CodeChangeInfo, policy: &TruncationPolicy) -> CodeBlock {
    let diff = truncate_diff(change.old_text.as_deref(), change.new_text.as_deref(), policy);
    let truncated = diff.is_truncated();

    let (language, content) = match change.change_type {
        ChangeType::Create => {
            (language_for(&change.file_path), diff.new.map(|t| t.into_owned()).unwrap_or_default())
        }
        ChangeType::Update => {
            let mut lines = Vec::new();
            if let Some(old) = &diff.old {
                lines.extend(old.lines().map(|l| format!("-{}", l)));
            }
            if let Some(new) = &diff.new {
                lines.extend(new.lines().map(|l| format!("+{}", l)));
            }
            (Some("diff"), lines.join("\n"))
        }
        ChangeType::Delete => (None, format!("(deleted {})", change.file_path)),
    };

    CodeBlock {
        file_path: change.file_path.clone(),
        change_type: change.change_type,
        language,
        content,
        lines_added: change.lines_added,
        lines_removed: change.lines_removed,
        truncated,
    }
}

fn language_for(file_path: &str) -> Option<&'static str> {
    let extension = Path::new(file_path).extension()?.to_str()?.to_lowercase();
    let language = match extension.as_str() {
        "rs" => "rust",
        "py" => "python",
        "ts" => "typescript",
        "tsx" => "tsx",
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "jsx",
        "json" => "json",
        "md" => "markdown",
        "toml" => "toml",
        "yaml" | "yml" => "yaml",
        "sh" | "bash" => "bash",
        "go" => "go",
        "java" => "java",
        "kt" => "kotlin",
        "swift" => "swift",
        "c" | "h" => "c",
        "cpp" | "cc" | "hpp" => "cpp",
        "rb" => "ruby",
        "html" => "html",
        "css" => "css",
        "sql" => "sql",
        _ => return None,
    };
    Some(language)
}
