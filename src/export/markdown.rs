use std::fmt::Write;

use chrono::{DateTime, Utc};

use super::code_blocks::{CodeBlock, code_blocks_for};
use super::{ExportOptions, MessageMetadata, format_timestamp};
use crate::models::SessionInfo;
use crate::tree::MessageNode;
use crate::view::{FilteredView, ViewStatistics};

const SEPARATOR: &str = "---";

/// Title heading, optional session metadata, then one section per message, each closed
/// by a `---` line.
pub fn render(
    view: &FilteredView<'_>,
    session: &SessionInfo,
    options: &ExportOptions,
    exported_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "# {}", session.display_title());
    out.push('\n');

    if options.include_metadata {
        write_session_metadata(&mut out, view, session, exported_at);
    }
    if options.include_stats {
        write_statistics(&mut out, &view.statistics());
    }

    for (node, qa_index) in view.indexed_messages() {
        write_message(&mut out, node, qa_index, options);
    }

    out
}

fn write_session_metadata(
    out: &mut String,
    view: &FilteredView<'_>,
    session: &SessionInfo,
    exported_at: DateTime<Utc>,
) {
    let _ = writeln!(out, "- **Session ID:** {}", session.id);
    if let Some(path) = &session.path {
        let _ = writeln!(out, "- **Path:** {}", path.display());
    }
    if let Some(created) = &session.created_at {
        let _ = writeln!(out, "- **Created:** {}", format_timestamp(created));
    }
    if let Some(updated) = &session.updated_at {
        let _ = writeln!(out, "- **Updated:** {}", format_timestamp(updated));
    }
    let _ = writeln!(out, "- **View Level:** {}", view.level().label());
    let _ = writeln!(out, "- **Exported:** {}", format_timestamp(&exported_at));
    out.push('\n');
}

fn write_statistics(out: &mut String, stats: &ViewStatistics) {
    out.push_str("## Statistics\n\n");
    let _ = writeln!(out, "- Messages: {}", stats.message_count);
    let _ = writeln!(
        out,
        "- By role: {} user, {} assistant, {} system, {} tool",
        stats.user_messages, stats.assistant_messages, stats.system_messages, stats.tool_messages
    );
    // Only the Q&A view counts pairs
    if let (Some(pairs), Some(answered)) = (stats.qa_pairs, stats.answered_pairs) {
        let _ = writeln!(out, "- Q&A pairs: {} ({} answered)", pairs, answered);
    }
    let changes = &stats.code_changes;
    if changes.total_changes() > 0 {
        let _ = writeln!(
            out,
            "- Code changes: {} across {} files (+{} -{})",
            changes.total_changes(),
            changes.files_changed,
            changes.lines_added,
            changes.lines_removed
        );
    }
    out.push('\n');
}

fn write_message(
    out: &mut String,
    node: &MessageNode,
    qa_index: Option<usize>,
    options: &ExportOptions,
) {
    match qa_index {
        Some(index) => {
            let _ = writeln!(out, "### {} (Q&A {})", node.role().label(), index + 1);
        }
        None => {
            let _ = writeln!(out, "### {}", node.role().label());
        }
    }
    out.push('\n');

    if options.include_timestamps {
        let _ = writeln!(out, "*{}*", format_timestamp(&node.record().timestamp));
        out.push('\n');
    }

    // Interim fragments can be empty; skip the blank paragraph
    let body = node.extracted_full_text().trim_end();
    if !body.is_empty() {
        out.push_str(body);
        out.push_str("\n\n");
    }

    if options.include_code_blocks {
        for block in code_blocks_for(node, &options.truncation) {
            write_code_block(out, &block);
        }
    }

    if options.include_metadata {
        let metadata = MessageMetadata::for_node(node, qa_index);
        let _ = write!(out, "<sub>id: `{}` · depth: {}", metadata.id, metadata.depth);
        if let Some(parent) = metadata.parent_id {
            let _ = write!(out, " · parent: `{}`", parent);
        }
        if let Some(thread) = metadata.thread_id {
            let _ = write!(out, " · thread: `{}`", thread);
        }
        out.push_str("</sub>\n\n");
    }

    out.push_str(SEPARATOR);
    out.push_str("\n\n");
}

fn write_code_block(out: &mut String, block: &CodeBlock) {
    let _ = writeln!(out, "**{}**", block.summary());
    out.push('\n');

    // The fence must be longer than any backtick run inside, or the block ends early
    let fence = "`".repeat(longest_backtick_run(&block.content).max(2) + 1);
    let _ = writeln!(out, "{}{}", fence, block.language.unwrap_or(""));
    out.push_str(&block.content);
    // Closing fence on its own line
    if !block.content.ends_with('\n') {
        out.push('\n');
    }
    let _ = writeln!(out, "{}", fence);
    out.push('\n');
}

/// Length of the longest run of consecutive backticks in `text`
fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
