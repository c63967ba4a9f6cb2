use std::path::PathBuf;

use anyhow::{Context, Result};

/// Directory name used under the platform data and config directories
pub const APP_DIR_NAME: &str = "ai-session-viewer";

const SESSIONS_SUBDIR: &str = "sessions";
const PREFERENCES_FILENAME: &str = "preferences.json";

/// Default location of the JSONL session files
///
/// - Linux: `~/.local/share/ai-session-viewer/sessions`
/// - macOS: `~/Library/Application Support/ai-session-viewer/sessions`
/// - Windows: `%APPDATA%\ai-session-viewer\sessions`
pub fn default_sessions_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir().context("Failed to get platform data directory")?;
    Ok(data_dir.join(APP_DIR_NAME).join(SESSIONS_SUBDIR))
}

/// Default location of the saved view-level preferences
pub fn default_preferences_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Failed to get platform config directory")?;
    Ok(config_dir.join(APP_DIR_NAME).join(PREFERENCES_FILENAME))
}
