use chrono::NaiveDate;

use super::ExportFormat;
use crate::models::SessionInfo;

/// Replace every character that is not alphanumeric in any script with `_`.
///
/// Letters and digits from non-Latin scripts (CJK, Cyrillic, ...) are kept as-is.
pub fn sanitize_title(title: &str) -> String {
    title.chars().map(|c| if c.is_alphanumeric() { c } else { '_' }).collect()
}

/// `<sanitized title or session id>_<YYYY-MM-DD>.<ext>`
pub fn export_filename(session: &SessionInfo, format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "{}_{}.{}",
        sanitize_title(session.display_title()),
        date.format("%Y-%m-%d"),
        format.extension()
    )
}
