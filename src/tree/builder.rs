use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use super::node::{MessageNode, NodeId};
use crate::models::Record;

/// Forest of [`MessageNode`]s built from a flat record log.
#[derive(Debug, Clone, Default)]
pub struct ConversationTree {
    nodes: Vec<MessageNode>,
    roots: Vec<NodeId>,
    index: HashMap<String, NodeId>,
    max_depth: usize,
    thread_count: usize,
}

impl ConversationTree {
    /// Root handles, in input order
    pub fn root_ids(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn roots(&self) -> impl Iterator<Item = &MessageNode> + '_ {
        self.roots.iter().map(|&id| self.node(id))
    }

    /// Node behind a handle produced by this tree
    pub fn node(&self, id: NodeId) -> &MessageNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&MessageNode> {
        self.nodes.get(id.0)
    }

    /// Look up a node by record id (last duplicate wins)
    pub fn find(&self, record_id: &str) -> Option<&MessageNode> {
        self.index.get(record_id).map(|&id| self.node(id))
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &MessageNode> + '_ {
        self.node(id).children.iter().map(|&child| self.node(child))
    }

    /// All nodes in input order
    pub fn nodes(&self) -> &[MessageNode] {
        &self.nodes
    }

    pub fn total_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Distinct non-null thread ids, plus one when any record is untagged
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Distinct non-null thread ids in first-seen order
    pub fn thread_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .filter_map(|n| n.record.thread_id.as_deref())
            .filter(|t| seen.insert(*t))
            .collect()
    }

    pub fn has_multiple_threads(&self) -> bool {
        self.thread_count > 1
    }

    /// Depth-first, parent-before-children ordering of every node
    pub fn depth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }

        order
    }

    /// Number of nodes in the subtree rooted at `id`, including `id`
    pub fn subtree_size(&self, id: NodeId) -> usize {
        let mut size = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            size += 1;
            stack.extend(self.node(current).children.iter().copied());
        }
        size
    }
}

/// Link `records` into a [`ConversationTree`].
///
/// Two passes: index every record by id, then attach each record to its resolved parent
/// in input order, so children keep discovery order. Depths come from a breadth-first
/// walk of each root. Runs in O(n).
pub fn build_tree(records: impl IntoIterator<Item = Record>) -> ConversationTree {
    let mut nodes: Vec<MessageNode> = records
        .into_iter()
        .enumerate()
        .map(|(i, record)| MessageNode::new(NodeId(i), record))
        .collect();

    let mut index = HashMap::with_capacity(nodes.len());
    for node in &nodes {
        // Duplicate ids: later records overwrite earlier ones
        index.insert(node.record.id.clone(), node.id);
    }

    // Input order here keeps children and roots in discovery order
    let mut roots = Vec::new();
    for i in 0..nodes.len() {
        let parent = match nodes[i].record.parent_id.as_deref() {
            Some(parent_id) => match index.get(parent_id) {
                // Self-parenting is treated like a dangling reference
                Some(&parent) if parent.0 != i => Some(parent),
                _ => {
                    debug!(
                        record = %nodes[i].record.id,
                        parent = parent_id,
                        "Parent reference does not resolve, promoting record to root"
                    );
                    None
                }
            },
            None => None,
        };

        match parent {
            Some(parent) => {
                nodes[i].parent = Some(parent);
                nodes[parent.0].children.push(NodeId(i));
            }
            None => roots.push(NodeId(i)),
        }
    }

    let mut visited = vec![false; nodes.len()];
    let mut visited_count = assign_depths(&mut nodes, &roots, &mut visited);

    // Anything not reached from a root sits on or below a parent cycle
    if visited_count < nodes.len() {
        for i in 0..nodes.len() {
            if visited[i] {
                continue;
            }
            // Promoting one member breaks the loop and makes the rest reachable
            let promoted = earliest_in_cycle(&nodes, NodeId(i));
            warn!(
                record = %nodes[promoted.0].record.id,
                "Parent references form a cycle, promoting record to root"
            );
            detach(&mut nodes, promoted);
            roots.push(promoted);
            visited_count += assign_depths(&mut nodes, &[promoted], &mut visited);
        }
        // Promoted roots were appended; restore input order
        roots.sort_unstable();
    }
    debug_assert_eq!(visited_count, nodes.len());

    let max_depth = nodes.iter().map(|n| n.depth).max().unwrap_or(0);
    let thread_count = count_threads(&nodes);

    ConversationTree { nodes, roots, index, max_depth, thread_count }
}

/// Breadth-first depth assignment from `starts`; returns how many nodes were reached
fn assign_depths(nodes: &mut [MessageNode], starts: &[NodeId], visited: &mut [bool]) -> usize {
    let mut reached = 0;
    let mut queue: VecDeque<(NodeId, usize)> = starts.iter().map(|&id| (id, 0)).collect();

    while let Some((id, depth)) = queue.pop_front() {
        if visited[id.0] {
            continue;
        }
        visited[id.0] = true;
        reached += 1;

        let node = &mut nodes[id.0];
        node.depth = depth;
        queue.extend(node.children.iter().map(|&child| (child, depth + 1)));
    }

    reached
}

/// Follow parent links from an unreachable node until the loop closes, and return the
/// loop member that appears first in the input.
fn earliest_in_cycle(nodes: &[MessageNode], start: NodeId) -> NodeId {
    // Walk up until a node repeats; that node is on the loop
    let mut on_path = HashSet::new();
    let mut current = start;
    while on_path.insert(current) {
        match nodes[current.0].parent {
            Some(parent) => current = parent,
            None => return current,
        }
    }

    // Go round the loop once to find its earliest member
    let entry = current;
    let mut earliest = entry;
    let mut member = nodes[entry.0].parent;
    while let Some(id) = member {
        if id == entry {
            break;
        }
        earliest = earliest.min(id);
        member = nodes[id.0].parent;
    }
    earliest
}

fn detach(nodes: &mut [MessageNode], id: NodeId) {
    if let Some(parent) = nodes[id.0].parent.take() {
        nodes[parent.0].children.retain(|&child| child != id);
    }
}

fn count_threads(nodes: &[MessageNode]) -> usize {
    if nodes.is_empty() {
        return 0;
    }

    let tagged: HashSet<&str> = nodes.iter().filter_map(|n| n.record.thread_id.as_deref()).collect();
    // Untagged records count as one implicit thread
    let untagged = nodes.iter().any(|n| n.record.thread_id.is_none());

    (tagged.len() + usize::from(untagged)).max(1)
}
