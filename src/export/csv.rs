use std::borrow::Cow;

use super::code_blocks::code_blocks_for;
use super::{ExportOptions, MessageMetadata, format_timestamp};
use crate::view::FilteredView;

const DELIMITER: char = ',';

/// Header row plus one row per message.
///
/// Content is flattened to a single line and capped at `options.csv_cell_limit` characters.
pub fn render(view: &FilteredView<'_>, options: &ExportOptions) -> String {
    let mut header = vec!["Timestamp", "Role", "Content"];
    if options.include_code_blocks {
        header.push("Code Blocks");
    }
    if options.include_metadata {
        header.push("Metadata");
    }

    let mut rows = vec![header.join(",")];

    for (node, qa_index) in view.indexed_messages() {
        let timestamp = if options.include_timestamps {
            format_timestamp(&node.record().timestamp)
        } else {
            String::new()
        };
        let content = flatten_content(node.extracted_full_text(), options.csv_cell_limit);

        let mut fields = vec![timestamp, node.role().label().to_string(), content];

        if options.include_code_blocks {
            let summaries: Vec<String> = code_blocks_for(node, &options.truncation)
                .iter()
                .map(|block| block.summary())
                .collect();
            fields.push(summaries.join("; "));
        }
        if options.include_metadata {
            let metadata = MessageMetadata::for_node(node, qa_index);
            fields.push(serde_json::to_string(&metadata).unwrap_or_default());
        }

        let row: Vec<Cow<'_, str>> = fields.iter().map(|f| escape_field(f)).collect();
        rows.push(row.join(","));
    }

    rows.join("\n")
}

/// Quote `field` when it contains the delimiter, a quote, or a line break, doubling
/// internal quotes
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([DELIMITER, '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn flatten_content(text: &str, limit: usize) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ").chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::export::ExportFormat;
    use crate::models::{Record, Role, ViewLevel};
    use crate::tree::build_tree;
    use crate::view::filter_by_level;

    /// Minimal RFC 4180 splitter for checking column counts
    fn split_row(row: &str) -> Vec<String> {
        let mut fields = vec![String::new()];
        let mut in_quotes = false;
        let mut chars = row.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '"' if in_quotes && chars.peek() == Some(&'"') => {
                    chars.next();
                    fields.last_mut().unwrap().push('"');
                }
                '"' => in_quotes = !in_quotes,
                ',' if !in_quotes => fields.push(String::new()),
                other => fields.last_mut().unwrap().push(other),
            }
        }
        fields
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_comma_and_quote_stay_in_one_cell() {
        let t = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let tree = build_tree(vec![Record::new("q", Role::User, "Hello, \"world\"", t)]);
        let view = filter_by_level(&tree, ViewLevel::Full);

        let csv = render(&view, &ExportOptions::new(ExportFormat::Csv));
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Timestamp,Role,Content");
        assert_eq!(lines[1], "2023-11-14T22:13:20Z,User,\"Hello, \"\"world\"\"\"");
        let fields = split_row(lines[1]);
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[2], "Hello, \"world\"");
    }

    #[test]
    fn test_optional_columns_and_flattening() {
        let t = DateTime::from_timestamp(0, 0).unwrap();
        let tree = build_tree(vec![Record::new("a", Role::Assistant, "line 1\nline 2", t)]);
        let view = filter_by_level(&tree, ViewLevel::Full);
        let mut options = ExportOptions::new(ExportFormat::Csv);
        options.include_code_blocks = true;
        options.include_metadata = true;
        options.include_timestamps = false;

        let csv = render(&view, &options);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Timestamp,Role,Content,Code Blocks,Metadata");
        let fields = split_row(lines[1]);
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[0], "");
        assert_eq!(fields[2], "line 1 line 2");
        assert_eq!(fields[4], r#"{"id":"a","depth":0}"#);
    }

    #[test]
    fn test_content_capped() {
        let long = "x".repeat(2500);
        assert_eq!(flatten_content(&long, 1000).len(), 1000);
        assert_eq!(flatten_content("a\r\nb\rc", 1000), "a b c");
    }
}
