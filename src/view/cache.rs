use std::collections::HashMap;

use tracing::debug;

use super::filter::{ViewEntries, filter_entries};
use crate::models::ViewLevel;
use crate::tree::ConversationTree;

/// Memoized view entries keyed by `(session_id, level)`.
///
/// Entries hold node handles, which stay valid only for trees built from the same records.
/// Callers invalidate explicitly: after a session's records change, or when its preferred
/// level changes. There is no time-based expiry.
#[derive(Debug, Default)]
pub struct ViewCache {
    entries: HashMap<(String, ViewLevel), ViewEntries>,
    hits: u64,
    misses: u64,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, session_id: &str, level: ViewLevel) -> Option<&ViewEntries> {
        self.entries.get(&(session_id.to_string(), level))
    }

    /// Cached entries, computing them from `tree` on a miss
    pub fn get_or_compute(
        &mut self,
        session_id: &str,
        level: ViewLevel,
        tree: &ConversationTree,
    ) -> &ViewEntries {
        let key = (session_id.to_string(), level);
        if self.entries.contains_key(&key) {
            self.hits += 1;
            debug!(session = session_id, %level, "View cache hit");
        } else {
            self.misses += 1;
            debug!(session = session_id, %level, "View cache miss");
        }
        self.entries.entry(key).or_insert_with(|| filter_entries(tree, level))
    }

    pub fn invalidate(&mut self, session_id: &str, level: ViewLevel) -> bool {
        self.entries.remove(&(session_id.to_string(), level)).is_some()
    }

    /// Drop every level cached for `session_id`; returns how many were removed
    pub fn invalidate_session(&mut self, session_id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(session, _), _| session != session_id);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation
    pub fn counters(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::models::{Record, Role};
    use crate::tree::build_tree;

    fn tree() -> ConversationTree {
        let t = DateTime::from_timestamp(0, 0).unwrap();
        build_tree(vec![
            Record::new("q", Role::User, "Q", t),
            Record::new("a", Role::Assistant, "A", t).with_parent("q"),
        ])
    }

    #[test]
    fn test_second_lookup_hits() {
        let tree = tree();
        let mut cache = ViewCache::new();

        let first = cache.get_or_compute("s1", ViewLevel::QaPairs, &tree).clone();
        let second = cache.get_or_compute("s1", ViewLevel::QaPairs, &tree).clone();

        assert_eq!(first, second);
        assert_eq!(cache.counters(), (1, 1));
    }

    #[test]
    fn test_levels_cached_separately() {
        let tree = tree();
        let mut cache = ViewCache::new();
        cache.get_or_compute("s1", ViewLevel::Full, &tree);
        cache.get_or_compute("s1", ViewLevel::CleanFlow, &tree);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_invalidate_session_only_touches_that_session() {
        let tree = tree();
        let mut cache = ViewCache::new();
        cache.get_or_compute("s1", ViewLevel::Full, &tree);
        cache.get_or_compute("s1", ViewLevel::QaPairs, &tree);
        cache.get_or_compute("s2", ViewLevel::Full, &tree);

        assert_eq!(cache.invalidate_session("s1"), 2);
        assert!(cache.get("s1", ViewLevel::Full).is_none());
        assert!(cache.get("s2", ViewLevel::Full).is_some());
    }

    #[test]
    fn test_invalidate_single_entry() {
        let tree = tree();
        let mut cache = ViewCache::new();
        cache.get_or_compute("s1", ViewLevel::Full, &tree);
        assert!(cache.invalidate("s1", ViewLevel::Full));
        assert!(!cache.invalidate("s1", ViewLevel::Full));
        assert!(cache.is_empty());
    }
}
