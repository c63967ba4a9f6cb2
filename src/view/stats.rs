use serde::{Deserialize, Serialize};

use super::filter::FilteredView;
use crate::models::{ChangeStatistics, Role, ViewLevel};

/// Counts describing a filtered view, embedded in exports on request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewStatistics {
    pub view_level: ViewLevel,
    pub message_count: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub system_messages: usize,
    pub tool_messages: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qa_pairs: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answered_pairs: Option<usize>,
    pub code_changes: ChangeStatistics,
}

impl ViewStatistics {
    pub fn for_view(view: &FilteredView<'_>) -> Self {
        let messages = view.messages();
        let count_role = |role: Role| messages.iter().filter(|n| n.role() == role).count();

        let (qa_pairs, answered_pairs) = match view.qa_pairs() {
            Some(pairs) => {
                (Some(pairs.len()), Some(pairs.iter().filter(|p| p.answer.is_some()).count()))
            }
            None => (None, None),
        };

        ViewStatistics {
            view_level: view.level(),
            message_count: messages.len(),
            user_messages: count_role(Role::User),
            assistant_messages: count_role(Role::Assistant),
            system_messages: count_role(Role::System),
            tool_messages: count_role(Role::Tool),
            qa_pairs,
            answered_pairs,
            code_changes: ChangeStatistics::from_changes(
                messages.iter().flat_map(|n| n.code_changes()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use serde_json::json;

    use super::*;
    use crate::models::Record;
    use crate::tree::build_tree;
    use crate::view::filter_by_level;

    #[test]
    fn test_statistics_for_qa_view() {
        let t = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let tree = build_tree(vec![
            Record::new("q1", Role::User, "make a file", t),
            Record::new(
                "a1",
                Role::Assistant,
                json!({"content": [
                    {"type": "text", "text": "done"},
                    {"type": "tool_use", "name": "write", "input": {"file_path": "x.txt", "content": "a\nb"}}
                ]}),
                t,
            )
            .with_parent("q1"),
            Record::new("s", Role::System, "noise", t).with_parent("a1"),
            Record::new("q2", Role::User, "thanks", t).with_parent("s"),
        ]);

        let stats = filter_by_level(&tree, ViewLevel::QaPairs).statistics();
        assert_eq!(stats.view_level, ViewLevel::QaPairs);
        assert_eq!(stats.message_count, 3);
        assert_eq!(stats.user_messages, 2);
        assert_eq!(stats.system_messages, 0);
        assert_eq!(stats.qa_pairs, Some(2));
        assert_eq!(stats.answered_pairs, Some(1));
        assert_eq!(stats.code_changes.creates, 1);
        assert_eq!(stats.code_changes.lines_added, 2);
    }

    #[test]
    fn test_statistics_for_full_view_has_no_pair_counts() {
        let t = DateTime::from_timestamp(0, 0).unwrap();
        let tree = build_tree(vec![Record::new("s", Role::System, "boot", t)]);
        let stats = filter_by_level(&tree, ViewLevel::Full).statistics();
        assert_eq!(stats.system_messages, 1);
        assert!(stats.qa_pairs.is_none());
    }
}
