//! Per-session view-level preferences
//!
//! Two stores implement [`PreferenceStore`]:
//! - [`MemoryPreferences`]: process-local, used by tests and embedders
//! - [`FilePreferences`]: a single JSON document rewritten atomically on every change
//!
//! Default file location: platform-specific config directories
//! - macOS: `~/Library/Application Support/ai-session-viewer/preferences.json`
//! - Linux: `~/.config/ai-session-viewer/preferences.json`
//! - Windows: `%APPDATA%\ai-session-viewer\preferences.json`

pub mod persistence;

use std::collections::HashMap;

use anyhow::Result;

use crate::models::ViewLevel;

pub use persistence::{FilePreferences, PREFERENCES_VERSION, PreferencesFile};

/// Remembers which view level a session was last shown at.
pub trait PreferenceStore {
    /// Saved level for `session_id`, `None` if nothing was saved
    fn get(&self, session_id: &str) -> Result<Option<ViewLevel>>;

    fn set(&mut self, session_id: &str, level: ViewLevel) -> Result<()>;

    /// Saved level, or [`ViewLevel::Full`] when there is none
    fn get_or_default(&self, session_id: &str) -> Result<ViewLevel> {
        Ok(self.get(session_id)?.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    levels: HashMap<String, ViewLevel>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, session_id: &str) -> Result<Option<ViewLevel>> {
        Ok(self.levels.get(session_id).copied())
    }

    fn set(&mut self, session_id: &str, level: ViewLevel) -> Result<()> {
        self.levels.insert(session_id.to_string(), level);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_preferences() {
        let mut prefs = MemoryPreferences::new();
        assert_eq!(prefs.get("s1").unwrap(), None);
        assert_eq!(prefs.get_or_default("s1").unwrap(), ViewLevel::Full);

        prefs.set("s1", ViewLevel::QaPairs).unwrap();
        prefs.set("s1", ViewLevel::CleanFlow).unwrap();
        assert_eq!(prefs.get("s1").unwrap(), Some(ViewLevel::CleanFlow));
        assert_eq!(prefs.get("s2").unwrap(), None);
    }
}
