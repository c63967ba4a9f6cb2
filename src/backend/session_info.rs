use std::path::Path;

use crate::models::{Role, SessionInfo};
use crate::tree::ConversationTree;

/// Longest derived title, in characters
pub const TITLE_MAX_CHARS: usize = 80;

/// Describe a session from its records: the title is the first line of the first user
/// message, and the created/updated times are the earliest and latest record timestamps.
pub fn derive_session_info(
    session_id: &str,
    path: Option<&Path>,
    tree: &ConversationTree,
) -> SessionInfo {
    let title = tree
        .nodes()
        .iter()
        .filter(|node| node.role() == Role::User)
        .find_map(|node| {
            let first_line = node.extracted_full_text().lines().map(str::trim).find(|l| !l.is_empty())?;
            Some(shorten(first_line, TITLE_MAX_CHARS))
        });

    let timestamps = tree.nodes().iter().map(|node| node.record().timestamp);

    SessionInfo {
        id: session_id.to_string(),
        title,
        path: path.map(Path::to_path_buf),
        created_at: timestamps.clone().min(),
        updated_at: timestamps.max(),
    }
}

fn shorten(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    short.truncate(short.trim_end().len());
    short.push('…');
    short
}
