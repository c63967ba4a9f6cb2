//! Rendering a filtered view into a downloadable document.
//!
//! Three formats are supported: a structured JSON document, CSV with one row per message, and
//! a Markdown narrative. All renderers are pure; the export timestamp is passed in rather than
//! read from the clock so identical inputs always produce identical documents.

pub mod code_blocks;
pub mod csv;
pub mod filename;
pub mod json;
pub mod markdown;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::diff::TruncationPolicy;
use crate::error::{Result, ViewerError};
use crate::models::{MessageKind, SessionInfo};
use crate::tree::MessageNode;
use crate::view::FilteredView;

pub use code_blocks::{CodeBlock, code_blocks_for};
pub use filename::{export_filename, sanitize_title};

/// Characters kept per CSV content cell
pub const CSV_CELL_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Markdown,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Markdown => "text/markdown",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "markdown",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = ViewerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(ViewerError::UnsupportedFormat { format: s.to_string() }),
        }
    }
}

/// What to include in an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub include_timestamps: bool,
    pub include_code_blocks: bool,
    pub include_metadata: bool,
    pub include_stats: bool,
    /// Applied to each side of a code block independently
    pub truncation: TruncationPolicy,
    pub csv_cell_limit: usize,
}

impl ExportOptions {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            include_timestamps: true,
            include_code_blocks: false,
            include_metadata: false,
            include_stats: false,
            truncation: TruncationPolicy::default(),
            csv_cell_limit: CSV_CELL_LIMIT,
        }
    }
}

/// A rendered export ready to be written or copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub filename: String,
    pub content: String,
    pub mime_type: &'static str,
}

/// Render `view` in the format chosen by `options`
pub fn export_view(
    view: &FilteredView<'_>,
    session: &SessionInfo,
    options: &ExportOptions,
    exported_at: DateTime<Utc>,
) -> Result<ExportedDocument> {
    let content = match options.format {
        ExportFormat::Json => json::render(view, session, options, exported_at)?,
        ExportFormat::Csv => csv::render(view, options),
        ExportFormat::Markdown => markdown::render(view, session, options, exported_at),
    };

    Ok(ExportedDocument {
        filename: export_filename(session, options.format, exported_at.date_naive()),
        content,
        mime_type: options.format.mime_type(),
    })
}

/// Per-message annotation included when `include_metadata` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata<'a> {
    pub id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<&'a str>,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qa_index: Option<usize>,
}

impl<'a> MessageMetadata<'a> {
    pub fn for_node(node: &'a MessageNode, qa_index: Option<usize>) -> Self {
        let record = node.record();
        Self {
            id: &record.id,
            parent_id: record.parent_id.as_deref(),
            depth: node.depth(),
            thread_id: record.thread_id.as_deref(),
            kind: record.kind,
            qa_index,
        }
    }
}

pub(crate) fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("markdown".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
    }

    #[test]
    fn test_unsupported_format_is_an_error() {
        let err = "pdf".parse::<ExportFormat>().unwrap_err();
        match err {
            ViewerError::UnsupportedFormat { format } => assert_eq!(format, "pdf"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_default_options() {
        let options = ExportOptions::new(ExportFormat::Csv);
        assert!(options.include_timestamps);
        assert!(!options.include_code_blocks);
        assert_eq!(options.csv_cell_limit, 1000);
    }
}
