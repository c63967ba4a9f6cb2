//! AI Session Viewer - conversation trees and multi-level views over AI chat sessions
//!
//! This library turns a flat log of conversational records into a browsable tree and
//! derives everything a session viewer shows from it:
//!
//! - Reading message text out of heterogeneous content shapes
//! - Building the reply tree from parent references
//! - Filtering at three view levels (full, clean flow, question/answer pairs)
//! - Recovering file changes from tool invocations, with bounded diffs
//! - Exporting a view as JSON, CSV or Markdown
//!
//! The engine functions are pure. Sessions stored on disk are served by
//! [`backend::DirectoryBackend`].
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use ai_session_viewer::{ViewLevel, build_tree, filter_by_level, parse_records_file};
//!
//! let records = parse_records_file(Path::new("session.jsonl"))?;
//! let tree = build_tree(records);
//! let view = filter_by_level(&tree, ViewLevel::QaPairs);
//! println!("{} question/answer pairs", view.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod backend;
pub mod changes;
pub mod cli;
pub mod clipboard;
pub mod config;
pub mod content;
pub mod diff;
pub mod error;
pub mod export;
pub mod models;
pub mod parsers;
pub mod preference_storage;
pub mod tree;
pub mod utils;
pub mod view;

// Re-export commonly used types
pub use backend::{DirectoryBackend, SessionBackend, SessionViewer};
pub use changes::{calculate_change_statistics, extract_code_changes};
pub use diff::{TruncationPolicy, truncate, truncate_diff};
pub use error::ViewerError;
pub use export::{ExportFormat, ExportOptions, ExportedDocument, export_view};
pub use models::{Record, Role, SessionInfo, SortOrder, ViewLevel};
pub use parsers::{parse_records_file, parse_session_file};
pub use tree::{ConversationTree, MessageNode, NodeId, build_tree};
pub use view::{FilteredView, filter_by_level};
