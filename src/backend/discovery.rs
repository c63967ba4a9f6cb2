use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::directory::SESSION_EXTENSION;
use super::session_info::derive_session_info;
use crate::changes::calculate_change_statistics;
use crate::models::{ChangeStatistics, SessionInfo, ViewLevel};
use crate::parsers::parse_session_file;
use crate::tree::ConversationTree;
use crate::view::filter_by_level;

/// Maximum number of session files to list (security: prevent resource exhaustion)
const MAX_SESSIONS: usize = 10_000;

/// Find `*.jsonl` session files directly inside `dir`, sorted by path.
///
/// Symlinks and subdirectories are skipped. A missing directory yields an empty list.
///
/// # Errors
///
/// Returns an error if the directory cannot be read or holds more than 10,000 sessions.
pub fn discover_sessions(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut sessions = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false) {
        let entry = entry.with_context(|| format!("Failed to read sessions directory: {}", dir.display()))?;

        if entry.path_is_symlink() {
            debug!(path = %entry.path().display(), "Skipping symlinked session file");
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some(SESSION_EXTENSION) {
            continue;
        }

        sessions.push(entry.into_path());
        if sessions.len() > MAX_SESSIONS {
            bail!("Too many session files in {} (max {})", dir.display(), MAX_SESSIONS);
        }
    }

    sessions.sort();
    Ok(sessions)
}

/// Headline numbers for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub info: SessionInfo,
    pub messages: usize,
    pub roots: usize,
    pub max_depth: usize,
    pub threads: usize,
    pub clean_flow_messages: usize,
    pub qa_pairs: usize,
    pub answered_pairs: usize,
    pub code_changes: ChangeStatistics,
}

impl SessionSummary {
    pub fn from_tree(info: SessionInfo, tree: &ConversationTree) -> Self {
        let qa = filter_by_level(tree, ViewLevel::QaPairs);
        let pairs = qa.qa_pairs().unwrap_or_default();

        Self {
            info,
            messages: tree.total_count(),
            roots: tree.root_ids().len(),
            max_depth: tree.max_depth(),
            threads: tree.thread_count(),
            clean_flow_messages: filter_by_level(tree, ViewLevel::CleanFlow).len(),
            qa_pairs: pairs.len(),
            answered_pairs: pairs.iter().filter(|p| p.answer.is_some()).count(),
            code_changes: calculate_change_statistics(tree),
        }
    }
}

/// Parse and summarize sessions in parallel.
///
/// Sessions that fail to parse are logged and left out; the result keeps the order of `paths`.
pub fn summarize_sessions(paths: &[PathBuf]) -> Vec<SessionSummary> {
    paths
        .par_iter()
        .filter_map(|path| match summarize_session(path) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!(path = %path.display(), "Skipping session: {:#}", e);
                None
            }
        })
        .collect()
}

fn summarize_session(path: &Path) -> Result<SessionSummary> {
    let tree = ConversationTree::from_source(parse_session_file(path)?);
    let session_id = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let info = derive_session_info(&session_id, Some(path), &tree);
    Ok(SessionSummary::from_tree(info, &tree))
}
