use std::collections::HashSet;

use crate::models::{ChangeStatistics, ChangeType, CodeChangeInfo};
use crate::tree::ConversationTree;

/// Reduce every code change in the tree to file, type and line totals.
///
/// Walks from the roots through all descendants. A file touched by several changes
/// counts once in `files_changed`.
pub fn calculate_change_statistics(tree: &ConversationTree) -> ChangeStatistics {
    let mut stack: Vec<_> = tree.root_ids().to_vec();
    let mut changes: Vec<&CodeChangeInfo> = Vec::new();

    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        changes.extend(node.code_changes());
        stack.extend(node.children().iter().copied());
    }

    ChangeStatistics::from_changes(changes)
}

impl ChangeStatistics {
    pub fn from_changes<'a>(changes: impl IntoIterator<Item = &'a CodeChangeInfo>) -> Self {
        let mut stats = ChangeStatistics::default();
        let mut files = HashSet::new();

        for change in changes {
            files.insert(change.file_path.as_str());
            match change.change_type {
                ChangeType::Create => stats.creates += 1,
                ChangeType::Update => stats.updates += 1,
                ChangeType::Delete => stats.deletes += 1,
            }
            stats.lines_added += change.lines_added.unwrap_or(0);
            stats.lines_removed += change.lines_removed.unwrap_or(0);
        }

        stats.files_changed = files.len();
        stats
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use serde_json::json;

    use super::*;
    use crate::models::{Record, Role};
    use crate::tree::build_tree;

    #[test]
    fn test_statistics_over_nested_nodes() {
        let t = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let records = vec![
            Record::new("q", Role::User, "please change things", t),
            Record::new(
                "a1",
                Role::Assistant,
                json!({"content": [
                    {"type": "tool_use", "name": "write", "input": {"file_path": "a.rs", "content": "1\n2\n3"}}
                ]}),
                t,
            )
            .with_parent("q"),
            Record::new(
                "a2",
                Role::Assistant,
                json!({"content": [
                    {"type": "tool_use", "name": "edit", "input": {"file_path": "a.rs", "old_string": "2", "new_string": "two\n2"}},
                    {"type": "tool_use", "name": "delete", "input": {"path": "b.rs"}}
                ]}),
                t,
            )
            .with_parent("a1"),
        ];

        let stats = calculate_change_statistics(&build_tree(records));
        assert_eq!(stats.files_changed, 2);
        assert_eq!(stats.creates, 1);
        assert_eq!(stats.updates, 1);
        assert_eq!(stats.deletes, 1);
        assert_eq!(stats.lines_added, 5);
        assert_eq!(stats.lines_removed, 1);
        assert_eq!(stats.total_changes(), 3);
    }

    #[test]
    fn test_statistics_empty_tree() {
        let stats = calculate_change_statistics(&build_tree(Vec::new()));
        assert_eq!(stats, ChangeStatistics::default());
    }
}
