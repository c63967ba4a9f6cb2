use std::fmt;
use std::sync::OnceLock;

use serde_json::Value;

use crate::changes::extract_changes_from_content;
use crate::content::{ExtractMode, PREVIEW_MAX_CHARS, PREVIEW_MAX_LINES, extract, preview};
use crate::models::{CodeChangeInfo, Record, Role};

/// Handle of a node inside a [`ConversationTree`](super::ConversationTree) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A [`Record`] placed in the tree, with lazily derived text and code changes.
///
/// Derived values are computed at most once per node and are safe to read from
/// several threads at the same time.
#[derive(Debug, Clone)]
pub struct MessageNode {
    pub(crate) id: NodeId,
    pub(crate) record: Record,
    pub(crate) depth: usize,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    full_text: OnceLock<String>,
    preview_text: OnceLock<String>,
    code_changes: OnceLock<Vec<CodeChangeInfo>>,
}

impl MessageNode {
    pub(crate) fn new(id: NodeId, record: Record) -> Self {
        Self {
            id,
            record,
            depth: 0,
            parent: None,
            children: Vec::new(),
            full_text: OnceLock::new(),
            preview_text: OnceLock::new(),
            code_changes: OnceLock::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn record_id(&self) -> &str {
        &self.record.id
    }

    pub fn role(&self) -> Role {
        self.record.role
    }

    pub fn raw_content(&self) -> &Value {
        &self.record.raw_content
    }

    /// 0 for roots
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in discovery (input) order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Full extracted text
    pub fn extracted_full_text(&self) -> &str {
        self.full_text.get_or_init(|| extract(self.raw_content(), self.role(), ExtractMode::Extracted))
    }

    /// Collapsed preview of [`Self::extracted_full_text`]
    pub fn extracted_text(&self) -> &str {
        self.preview_text
            .get_or_init(|| preview(self.extracted_full_text(), PREVIEW_MAX_LINES, PREVIEW_MAX_CHARS))
    }

    /// Whether the preview hides part of the text
    pub fn needs_expansion(&self) -> bool {
        self.extracted_text() != self.extracted_full_text()
    }

    /// Pretty-printed dump of the raw content
    pub fn raw_text(&self) -> String {
        extract(self.raw_content(), self.role(), ExtractMode::Raw)
    }

    /// Code changes embedded in this node's content, extracted on first access
    pub fn code_changes(&self) -> &[CodeChangeInfo] {
        self.code_changes.get_or_init(|| extract_changes_from_content(self.raw_content()))
    }
}
