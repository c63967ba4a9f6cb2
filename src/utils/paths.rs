use std::borrow::Cow;
use std::env;
use std::fs::{File, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result, bail};

// Maximum file size for JSONL session files: 10MB
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Opens a file for reading without following a symlink at the final path component
///
/// On Unix this uses `O_NOFOLLOW`, so the check and the open are a single syscall and
/// cannot race. Elsewhere the path is checked with `symlink_metadata` first.
///
/// # Errors
///
/// Returns an error if the path is a symlink or the file cannot be opened.
pub fn safe_open_file(path: &Path) -> Result<File> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;

        OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NOFOLLOW)
            .open(path)
            .with_context(|| format!("Failed to open file (symlinks are refused): {}", path.display()))
    }

    #[cfg(not(unix))]
    {
        let metadata = std::fs::symlink_metadata(path)
            .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;
        if metadata.file_type().is_symlink() {
            bail!("Refusing to open symlink: {}", path.display());
        }
        OpenOptions::new()
            .read(true)
            .open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))
    }
}

/// Validates that a file's size is within acceptable limits (10MB)
///
/// Takes an open file handle to avoid TOCTOU (time-of-check-time-of-use)
/// race conditions where the file could be modified between the size check
/// and subsequent file operations.
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read
/// - The file is larger than 10MB
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_FILE_SIZE_BYTES
        );
    }

    Ok(())
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use ai_session_viewer::utils::format_path_with_tilde;
///
/// let path = PathBuf::from("/Users/alice/sessions/demo.jsonl");
/// // Returns "~/sessions/demo.jsonl" if HOME=/Users/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
