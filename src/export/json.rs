use chrono::{DateTime, Utc};
use serde::Serialize;

use super::code_blocks::{CodeBlock, code_blocks_for};
use super::{ExportOptions, MessageMetadata, format_timestamp};
use crate::error::Result;
use crate::models::{SessionInfo, ViewLevel};
use crate::view::{FilteredView, ViewStatistics};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDocument<'a> {
    session: JsonSession<'a>,
    messages: Vec<JsonMessage<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSession<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
    view_level: ViewLevel,
    exported_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<ViewStatistics>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonMessage<'a> {
    role: &'static str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_blocks: Option<Vec<CodeBlock>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<MessageMetadata<'a>>,
}

/// `{ "session": {...}, "messages": [...] }`, pretty-printed
pub fn render(
    view: &FilteredView<'_>,
    session: &SessionInfo,
    options: &ExportOptions,
    exported_at: DateTime<Utc>,
) -> Result<String> {
    let messages = view
        .indexed_messages()
        .into_iter()
        .map(|(node, qa_index)| {
            let code_blocks = options
                .include_code_blocks
                .then(|| code_blocks_for(node, &options.truncation))
                .filter(|blocks| !blocks.is_empty());

            JsonMessage {
                role: node.role().as_str(),
                content: node.extracted_full_text(),
                timestamp: options.include_timestamps.then(|| format_timestamp(&node.record().timestamp)),
                code_blocks,
                metadata: options.include_metadata.then(|| MessageMetadata::for_node(node, qa_index)),
            }
        })
        .collect();

    let document = JsonDocument {
        session: JsonSession {
            id: &session.id,
            title: session.title.as_deref(),
            path: session.path.as_ref().map(|p| p.display().to_string()),
            created_at: session.created_at.as_ref().map(format_timestamp),
            updated_at: session.updated_at.as_ref().map(format_timestamp),
            view_level: view.level(),
            exported_at: format_timestamp(&exported_at),
            stats: options.include_stats.then(|| view.statistics()),
        },
        messages,
    };

    Ok(serde_json::to_string_pretty(&document)?)
}
