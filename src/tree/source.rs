use serde::{Deserialize, Serialize};

use super::builder::{ConversationTree, build_tree};
use super::node::NodeId;
use crate::models::Record;

/// Conversation data as handed over by the backend: either the flat record log or a
/// tree the backend already nested.
#[derive(Debug, Clone)]
pub enum TreeSource {
    Records(Vec<Record>),
    Tree(Vec<NestedNode>),
}

/// One node of a backend-nested tree: the record's own fields plus its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedNode {
    #[serde(flatten)]
    pub record: Record,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NestedNode>,
}

impl TreeSource {
    /// Build the tree. Nested input is flattened parent-first and rebuilt through
    /// [`build_tree`], so both forms yield identical trees.
    pub fn into_tree(self) -> ConversationTree {
        match self {
            TreeSource::Records(records) => build_tree(records),
            TreeSource::Tree(roots) => build_tree(flatten_nested(roots)),
        }
    }

    /// Flat record log, parents before children for nested input
    pub fn into_records(self) -> Vec<Record> {
        match self {
            TreeSource::Records(records) => records,
            TreeSource::Tree(roots) => flatten_nested(roots),
        }
    }
}

impl From<Vec<Record>> for TreeSource {
    fn from(records: Vec<Record>) -> Self {
        TreeSource::Records(records)
    }
}

impl From<Vec<NestedNode>> for TreeSource {
    fn from(roots: Vec<NestedNode>) -> Self {
        TreeSource::Tree(roots)
    }
}

fn flatten_nested(roots: Vec<NestedNode>) -> Vec<Record> {
    let mut records = Vec::new();
    let mut stack: Vec<(NestedNode, Option<String>)> =
        roots.into_iter().rev().map(|node| (node, None)).collect();

    while let Some((node, structural_parent)) = stack.pop() {
        let NestedNode { mut record, children } = node;
        if record.parent_id.is_none() {
            record.parent_id = structural_parent;
        }
        let id = record.id.clone();
        records.push(record);
        stack.extend(children.into_iter().rev().map(|child| (child, Some(id.clone()))));
    }

    records
}

impl ConversationTree {
    /// Build from whichever form the backend supplied
    pub fn from_source(source: impl Into<TreeSource>) -> Self {
        source.into().into_tree()
    }

    /// Nested representation, the same shape [`TreeSource::Tree`] accepts
    pub fn to_nested(&self) -> Vec<NestedNode> {
        self.root_ids().iter().map(|&root| self.nest(root)).collect()
    }

    fn nest(&self, id: NodeId) -> NestedNode {
        let node = self.node(id);
        NestedNode {
            record: node.record().clone(),
            children: node.children().iter().map(|&child| self.nest(child)).collect(),
        }
    }
}
