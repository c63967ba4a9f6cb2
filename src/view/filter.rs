use std::cmp::Ordering;

use super::qa::{QaPair, pair_questions};
use super::stats::ViewStatistics;
use super::thinking::is_interim;
use crate::models::{SortOrder, ViewLevel};
use crate::tree::{ConversationTree, MessageNode, NodeId};

/// Result of filtering, as node handles into the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEntries {
    Messages(Vec<NodeId>),
    QaPairs(Vec<QaPair>),
}

impl ViewEntries {
    pub fn len(&self) -> usize {
        match self {
            ViewEntries::Messages(ids) => ids.len(),
            ViewEntries::QaPairs(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compute the entries for `level`. Never touches the tree.
pub fn filter_entries(tree: &ConversationTree, level: ViewLevel) -> ViewEntries {
    match level {
        ViewLevel::Full => ViewEntries::Messages(tree.depth_first()),
        ViewLevel::CleanFlow => ViewEntries::Messages(clean_flow(tree)),
        ViewLevel::QaPairs => ViewEntries::QaPairs(pair_questions(tree, &clean_flow(tree))),
    }
}

fn clean_flow(tree: &ConversationTree) -> Vec<NodeId> {
    tree.depth_first()
        .into_iter()
        .filter(|&id| {
            let node = tree.node(id);
            !node.role().is_noise() && !is_interim(node)
        })
        .collect()
}

/// Reorder entries by timestamp. The sort is stable, so equal timestamps keep the
/// canonical order. QA pairs sort by their question.
pub fn sort_entries(tree: &ConversationTree, entries: ViewEntries, order: SortOrder) -> ViewEntries {
    let compare = |a: NodeId, b: NodeId| -> Ordering {
        let ordering = tree.node(a).record().timestamp.cmp(&tree.node(b).record().timestamp);
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    };

    match entries {
        ViewEntries::Messages(mut ids) => {
            ids.sort_by(|&a, &b| compare(a, b));
            ViewEntries::Messages(ids)
        }
        ViewEntries::QaPairs(mut pairs) => {
            pairs.sort_by(|a, b| compare(a.question, b.question));
            ViewEntries::QaPairs(pairs)
        }
    }
}

/// A filtered view borrowing its tree.
#[derive(Debug, Clone)]
pub struct FilteredView<'t> {
    tree: &'t ConversationTree,
    level: ViewLevel,
    entries: ViewEntries,
}

/// Filter `tree` at `level`
pub fn filter_by_level(tree: &ConversationTree, level: ViewLevel) -> FilteredView<'_> {
    FilteredView::new(tree, level, filter_entries(tree, level))
}

impl<'t> FilteredView<'t> {
    /// Wrap precomputed entries (for example from a [`ViewCache`](super::ViewCache))
    pub fn new(tree: &'t ConversationTree, level: ViewLevel, entries: ViewEntries) -> Self {
        Self { tree, level, entries }
    }

    pub fn tree(&self) -> &'t ConversationTree {
        self.tree
    }

    pub fn level(&self) -> ViewLevel {
        self.level
    }

    pub fn entries(&self) -> &ViewEntries {
        &self.entries
    }

    /// Number of entries: messages, or pairs for the QA level
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply the display sort
    pub fn sorted(self, order: SortOrder) -> Self {
        let entries = sort_entries(self.tree, self.entries, order);
        Self { entries, ..self }
    }

    /// Messages in display order. QA pairs expand to question then answer.
    pub fn messages(&self) -> Vec<&'t MessageNode> {
        match &self.entries {
            ViewEntries::Messages(ids) => ids.iter().map(|&id| self.tree.node(id)).collect(),
            ViewEntries::QaPairs(pairs) => pairs
                .iter()
                .flat_map(|pair| std::iter::once(pair.question).chain(pair.answer))
                .map(|id| self.tree.node(id))
                .collect(),
        }
    }

    /// Messages paired with the QA index they belong to, if any
    pub fn indexed_messages(&self) -> Vec<(&'t MessageNode, Option<usize>)> {
        match &self.entries {
            ViewEntries::Messages(ids) => ids.iter().map(|&id| (self.tree.node(id), None)).collect(),
            ViewEntries::QaPairs(pairs) => pairs
                .iter()
                .flat_map(|pair| {
                    std::iter::once(pair.question)
                        .chain(pair.answer)
                        .map(move |id| (self.tree.node(id), Some(pair.index)))
                })
                .collect(),
        }
    }

    pub fn qa_pairs(&self) -> Option<&[QaPair]> {
        match &self.entries {
            ViewEntries::QaPairs(pairs) => Some(pairs),
            ViewEntries::Messages(_) => None,
        }
    }

    pub fn statistics(&self) -> ViewStatistics {
        ViewStatistics::for_view(self)
    }
}
