use serde::{Deserialize, Serialize};

use crate::models::{Record, Role};
use crate::tree::{ConversationTree, NodeId};

/// A user question and the assistant reply that closed it, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QaPair {
    /// Position within the view, from 0
    pub index: usize,
    pub question: NodeId,
    pub answer: Option<NodeId>,
}

impl QaPair {
    /// Owned record form, as returned by the backend's QA query
    pub fn to_records(&self, tree: &ConversationTree) -> QaRecordPair {
        QaRecordPair {
            index: self.index,
            question: tree.node(self.question).record().clone(),
            answer: self.answer.map(|id| tree.node(id).record().clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaRecordPair {
    pub index: usize,
    pub question: Record,
    pub answer: Option<Record>,
}

/// Single left-to-right scan pairing questions with answers.
///
/// `flow` must already be clean (no noise records, no interim assistant fragments), which
/// makes every assistant node a closing answer. A question still open when the next one
/// arrives, or when the flow ends, is emitted without an answer. Assistant nodes with no
/// open question are skipped.
pub fn pair_questions(tree: &ConversationTree, flow: &[NodeId]) -> Vec<QaPair> {
    let mut pairs = Vec::new();
    let mut open: Option<NodeId> = None;

    for &id in flow {
        match tree.node(id).role() {
            Role::User => {
                if let Some(question) = open.replace(id) {
                    pairs.push(QaPair { index: pairs.len(), question, answer: None });
                }
            }
            Role::Assistant => {
                if let Some(question) = open.take() {
                    pairs.push(QaPair { index: pairs.len(), question, answer: Some(id) });
                }
            }
            Role::System | Role::Tool => {}
        }
    }

    if let Some(question) = open {
        pairs.push(QaPair { index: pairs.len(), question, answer: None });
    }

    pairs
}
