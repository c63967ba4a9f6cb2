//! Runtime configuration.
//!
//! Values are resolved in three layers: built-in defaults, then environment variables, then
//! whatever the CLI overrides on the returned struct. Bad environment values are reported
//! with a warning and ignored.

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;

use crate::content::{PREVIEW_MAX_CHARS, PREVIEW_MAX_LINES};
use crate::diff::TruncationPolicy;
use crate::export::CSV_CELL_LIMIT;
use crate::utils::{default_preferences_path, default_sessions_dir};

pub const SESSIONS_DIR_ENV: &str = "AI_SESSION_VIEWER_DIR";
pub const MAX_LINES_ENV: &str = "AI_SESSION_VIEWER_MAX_LINES";
pub const KEEP_LINES_ENV: &str = "AI_SESSION_VIEWER_KEEP_LINES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub sessions_dir: PathBuf,
    pub preferences_path: PathBuf,
    pub truncation: TruncationPolicy,
    /// Preview size for CLI message display only. [`MessageNode::extracted_text`] keeps the
    /// fixed [`PREVIEW_MAX_LINES`] / [`PREVIEW_MAX_CHARS`] limits.
    ///
    /// [`MessageNode::extracted_text`]: crate::tree::MessageNode::extracted_text
    pub preview_lines: usize,
    /// See [`preview_lines`](Self::preview_lines)
    pub preview_chars: usize,
    pub csv_cell_limit: usize,
}

impl ViewerConfig {
    /// Defaults overlaid with the process environment
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each variable
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let sessions_dir = match lookup(SESSIONS_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_sessions_dir()?,
        };

        let mut truncation = TruncationPolicy::default();
        if let Some(max_lines) = parse_positive(MAX_LINES_ENV, lookup(MAX_LINES_ENV)) {
            truncation.max_lines = max_lines;
        }
        if let Some(keep_lines) = parse_positive(KEEP_LINES_ENV, lookup(KEEP_LINES_ENV)) {
            truncation.keep_lines = keep_lines;
        }

        Ok(Self {
            sessions_dir,
            preferences_path: default_preferences_path()?,
            truncation: truncation.clamped(),
            preview_lines: PREVIEW_MAX_LINES,
            preview_chars: PREVIEW_MAX_CHARS,
            csv_cell_limit: CSV_CELL_LIMIT,
        })
    }

    /// Replace the truncation thresholds, clamping `keep_lines` against `max_lines`
    pub fn set_truncation(&mut self, max_lines: Option<usize>, keep_lines: Option<usize>) {
        let mut policy = self.truncation;
        if let Some(max_lines) = max_lines {
            policy.max_lines = max_lines;
        }
        if let Some(keep_lines) = keep_lines {
            policy.keep_lines = keep_lines;
        }
        self.truncation = policy.clamped();
    }
}

fn parse_positive(key: &str, value: Option<String>) -> Option<usize> {
    let value = value?;
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            warn!(variable = key, value = %value, "Ignoring invalid value, expected a positive integer");
            None
        }
    }
}
