use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use super::SessionBackend;
use super::session_info::derive_session_info;
use crate::diff::TruncationPolicy;
use crate::export::{ExportFormat, ExportOptions};
use crate::models::{Record, SessionInfo, ViewLevel};
use crate::parsers::parse_session_file;
use crate::preference_storage::PreferenceStore;
use crate::tree::ConversationTree;

/// File extension of session files
pub const SESSION_EXTENSION: &str = "jsonl";

/// Serves `<dir>/<session_id>.jsonl` files, with preferences kept in any [`PreferenceStore`].
pub struct DirectoryBackend {
    dir: PathBuf,
    preferences: Box<dyn PreferenceStore + Send>,
    truncation: TruncationPolicy,
    csv_cell_limit: Option<usize>,
}

impl DirectoryBackend {
    pub fn new(dir: impl Into<PathBuf>, preferences: impl PreferenceStore + Send + 'static) -> Self {
        Self {
            dir: dir.into(),
            preferences: Box::new(preferences),
            truncation: TruncationPolicy::default(),
            csv_cell_limit: None,
        }
    }

    pub fn with_truncation(mut self, truncation: TruncationPolicy) -> Self {
        self.truncation = truncation;
        self
    }

    pub fn with_csv_cell_limit(mut self, limit: usize) -> Self {
        self.csv_cell_limit = Some(limit);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `session_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or could escape the directory
    /// (path separators, `..`).
    pub fn session_path(&self, session_id: &str) -> Result<PathBuf> {
        if session_id.is_empty()
            || session_id == "."
            || session_id == ".."
            || session_id.contains(['/', '\\', '\0'])
        {
            bail!("Invalid session id: '{}'", session_id);
        }
        Ok(self.dir.join(format!("{}.{}", session_id, SESSION_EXTENSION)))
    }
}

impl SessionBackend for DirectoryBackend {
    fn get_records(&self, session_id: &str) -> Result<Vec<Record>> {
        Ok(parse_session_file(&self.session_path(session_id)?)?.into_records())
    }

    fn get_tree(&self, session_id: &str) -> Result<ConversationTree> {
        Ok(ConversationTree::from_source(parse_session_file(&self.session_path(session_id)?)?))
    }

    fn session_info_for(&self, session_id: &str, tree: &ConversationTree) -> Result<SessionInfo> {
        let path = self.session_path(session_id)?;
        Ok(derive_session_info(session_id, Some(&path), tree))
    }

    fn get_view_level_preference(&self, session_id: &str) -> Result<ViewLevel> {
        self.preferences.get_or_default(session_id)
    }

    fn save_view_level_preference(&mut self, session_id: &str, level: ViewLevel) -> Result<()> {
        self.preferences.set(session_id, level)
    }

    fn export_options(&self, format: ExportFormat) -> ExportOptions {
        let mut options = ExportOptions::new(format);
        options.truncation = self.truncation;
        if let Some(limit) = self.csv_cell_limit {
            options.csv_cell_limit = limit;
        }
        options
    }
}
