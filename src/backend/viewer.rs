use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::debug;

use super::SessionBackend;
use crate::models::{SortOrder, ViewLevel};
use crate::tree::ConversationTree;
use crate::view::{FilteredView, ViewCache};

/// Client-side session state: loaded trees, memoized views, and preferences routed through
/// the backend.
///
/// Saving a preference drops every cached view of that session.
pub struct SessionViewer<B> {
    backend: B,
    trees: HashMap<String, ConversationTree>,
    cache: ViewCache,
}

impl<B: SessionBackend> SessionViewer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend, trees: HashMap::new(), cache: ViewCache::new() }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cache(&self) -> &ViewCache {
        &self.cache
    }

    /// Tree for `session_id`, loaded from the backend on first use
    pub fn tree(&mut self, session_id: &str) -> Result<&ConversationTree> {
        self.load(session_id)?;
        self.trees.get(session_id).context("Session tree missing after load")
    }

    /// View at `level`, or at the saved preference when `level` is `None`. Without an
    /// `order` the entries stay in depth-first, parent-before-children order.
    pub fn view(
        &mut self,
        session_id: &str,
        level: Option<ViewLevel>,
        order: Option<SortOrder>,
    ) -> Result<FilteredView<'_>> {
        let level = match level {
            Some(level) => level,
            None => self.backend.get_view_level_preference(session_id)?,
        };
        self.load(session_id)?;

        let tree = self.trees.get(session_id).context("Session tree missing after load")?;
        let entries = self.cache.get_or_compute(session_id, level, tree).clone();
        let view = FilteredView::new(tree, level, entries);
        Ok(match order {
            Some(order) => view.sorted(order),
            None => view,
        })
    }

    pub fn view_level(&self, session_id: &str) -> Result<ViewLevel> {
        self.backend.get_view_level_preference(session_id)
    }

    /// Persist `level` as the session's preference and invalidate its cached views
    pub fn set_view_level(&mut self, session_id: &str, level: ViewLevel) -> Result<()> {
        self.backend.save_view_level_preference(session_id, level)?;
        let dropped = self.cache.invalidate_session(session_id);
        debug!(session = session_id, %level, dropped, "View level preference changed");
        Ok(())
    }

    /// Forget the loaded tree and cached views, so the next access re-reads the backend
    pub fn reload(&mut self, session_id: &str) {
        self.trees.remove(session_id);
        self.cache.invalidate_session(session_id);
    }

    fn load(&mut self, session_id: &str) -> Result<()> {
        if !self.trees.contains_key(session_id) {
            let tree = self.backend.get_tree(session_id)?;
            debug!(session = session_id, nodes = tree.total_count(), "Loaded session tree");
            self.trees.insert(session_id.to_string(), tree);
        }
        Ok(())
    }
}
