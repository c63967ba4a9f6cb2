//! Session backends: where records come from and where preferences go.
//!
//! [`SessionBackend`] mirrors the query surface a conversation viewer needs from its server.
//! Every derived query has a default implementation built from the same engine functions the
//! client uses ([`build_tree`], [`filter_by_level`], [`export_view`]), so server-side and
//! client-side results agree by construction. [`DirectoryBackend`] serves sessions from a
//! directory of JSONL files.
//!
//! [`build_tree`]: crate::tree::build_tree
//! [`filter_by_level`]: crate::view::filter_by_level
//! [`export_view`]: crate::export::export_view

pub mod directory;
pub mod discovery;
pub mod session_info;
pub mod viewer;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::error::ViewerError;
use crate::export::{ExportFormat, ExportOptions, ExportedDocument, export_view};
use crate::models::{Record, SessionInfo, ViewLevel};
use crate::tree::{ConversationTree, build_tree};
use crate::view::{QaRecordPair, filter_by_level};

pub use directory::DirectoryBackend;
pub use discovery::{SessionSummary, discover_sessions, summarize_sessions};
pub use session_info::{TITLE_MAX_CHARS, derive_session_info};
pub use viewer::SessionViewer;

pub trait SessionBackend {
    /// Raw records of a session, in ingestion order
    fn get_records(&self, session_id: &str) -> Result<Vec<Record>>;

    fn get_view_level_preference(&self, session_id: &str) -> Result<ViewLevel>;

    fn save_view_level_preference(&mut self, session_id: &str, level: ViewLevel) -> Result<()>;

    /// Options used by [`export_session`](Self::export_session)
    fn export_options(&self, format: ExportFormat) -> ExportOptions {
        ExportOptions::new(format)
    }

    fn get_tree(&self, session_id: &str) -> Result<ConversationTree> {
        Ok(build_tree(self.get_records(session_id)?))
    }

    fn session_info(&self, session_id: &str) -> Result<SessionInfo> {
        let tree = self.get_tree(session_id)?;
        self.session_info_for(session_id, &tree)
    }

    /// Header metadata for a tree the caller already loaded
    fn session_info_for(&self, session_id: &str, tree: &ConversationTree) -> Result<SessionInfo> {
        Ok(derive_session_info(session_id, None, tree))
    }

    /// Records visible at `level`; QA pairs expand to question then answer
    fn get_messages_by_level(&self, session_id: &str, level: ViewLevel) -> Result<Vec<Record>> {
        let tree = self.get_tree(session_id)?;
        let view = filter_by_level(&tree, level);
        Ok(view.messages().into_iter().map(|node| node.record().clone()).collect())
    }

    /// QA pairs of a session. Only [`ViewLevel::QaPairs`] defines pairs; any other level is
    /// rejected with [`ViewerError::InvalidViewLevel`].
    fn get_qa_pairs_by_level(&self, session_id: &str, level: ViewLevel) -> Result<Vec<QaRecordPair>> {
        if level != ViewLevel::QaPairs {
            return Err(ViewerError::InvalidViewLevel { level: level.to_string() }.into());
        }

        let tree = self.get_tree(session_id)?;
        let view = filter_by_level(&tree, level);
        Ok(view.qa_pairs().unwrap_or_default().iter().map(|pair| pair.to_records(&tree)).collect())
    }

    fn export_session(
        &self,
        session_id: &str,
        level: ViewLevel,
        format: ExportFormat,
    ) -> Result<ExportedDocument> {
        self.export_session_at(session_id, level, &self.export_options(format), Utc::now())
    }

    /// [`export_session`](Self::export_session) with explicit options and export time
    fn export_session_at(
        &self,
        session_id: &str,
        level: ViewLevel,
        options: &ExportOptions,
        exported_at: DateTime<Utc>,
    ) -> Result<ExportedDocument> {
        let tree = self.get_tree(session_id)?;
        let session = self.session_info_for(session_id, &tree)?;
        let view = filter_by_level(&tree, level);
        Ok(export_view(&view, &session, options, exported_at)?)
    }
}
