//! Preference file persistence: load/save with atomic writes

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::PreferenceStore;
use crate::models::ViewLevel;
use crate::utils::default_preferences_path;

/// Schema version for the preferences file
pub const PREFERENCES_VERSION: u32 = 1;

/// On-disk layout of the preferences file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesFile {
    pub version: u32,
    #[serde(default)]
    pub view_levels: BTreeMap<String, ViewLevel>,
}

impl Default for PreferencesFile {
    fn default() -> Self {
        Self { version: PREFERENCES_VERSION, view_levels: BTreeMap::new() }
    }
}

/// Preferences stored in a JSON file, loaded once and rewritten on every change.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
    contents: PreferencesFile,
}

impl FilePreferences {
    /// Open the store at the platform default location
    pub fn open_default() -> Result<Self> {
        Self::open(default_preferences_path()?)
    }

    /// Load `path`. A missing file, or one written by another schema version, starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = load_preferences(&path)?.unwrap_or_default();
        Ok(Self { path, contents })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.contents.view_levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.view_levels.is_empty()
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, session_id: &str) -> Result<Option<ViewLevel>> {
        Ok(self.contents.view_levels.get(session_id).copied())
    }

    fn set(&mut self, session_id: &str, level: ViewLevel) -> Result<()> {
        self.contents.view_levels.insert(session_id.to_string(), level);
        save_preferences(&self.path, &self.contents)?;
        debug!(session = session_id, %level, path = %self.path.display(), "Saved view level preference");
        Ok(())
    }
}

/// Returns None if the file is missing or has a different version
pub fn load_preferences(path: &Path) -> Result<Option<PreferencesFile>> {
    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read preferences file: {}", path.display()))?;
    let contents: PreferencesFile = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse preferences JSON: {}", path.display()))?;

    if contents.version != PREFERENCES_VERSION {
        warn!(
            expected = PREFERENCES_VERSION,
            found = contents.version,
            "Preferences version mismatch, starting with empty preferences"
        );
        return Ok(None);
    }

    Ok(Some(contents))
}

/// Write `contents` to `path` atomically (temp file + rename)
pub fn save_preferences(path: &Path, contents: &PreferencesFile) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent).context("Failed to create preferences directory")?;
    }

    let file_name = path
        .file_name()
        .with_context(|| format!("Preferences path has no file name: {}", path.display()))?;
    let mut temp_name = file_name.to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let json = serde_json::to_string_pretty(contents).context("Failed to serialize preferences")?;
    fs::write(&temp_path, json).context("Failed to write preferences temp file")?;
    fs::rename(&temp_path, path).context("Failed to rename preferences temp file")?;

    Ok(())
}
