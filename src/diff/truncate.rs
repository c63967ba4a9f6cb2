use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Texts at or below this many lines are never truncated
pub const DEFAULT_MAX_LINES: usize = 1000;

/// Lines kept at each end of a truncated text
pub const DEFAULT_KEEP_LINES: usize = 300;

/// Head/tail truncation thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruncationPolicy {
    pub max_lines: usize,
    pub keep_lines: usize,
}

impl Default for TruncationPolicy {
    fn default() -> Self {
        Self { max_lines: DEFAULT_MAX_LINES, keep_lines: DEFAULT_KEEP_LINES }
    }
}

impl TruncationPolicy {
    pub fn new(max_lines: usize, keep_lines: usize) -> Self {
        Self { max_lines, keep_lines }
    }

    /// Shrink `keep_lines` so a truncated text is always shorter than `max_lines`
    pub fn clamped(self) -> Self {
        let max_keep = self.max_lines.saturating_sub(1) / 2;
        Self { max_lines: self.max_lines, keep_lines: self.keep_lines.min(max_keep) }
    }

    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        truncate(text, self.max_lines, self.keep_lines)
    }
}

/// Keep the first and last `keep_lines` lines of `text` once it exceeds `max_lines`,
/// replacing the middle with a single marker line.
///
/// A truncated result always has exactly `2 * keep_lines + 1` lines. Text that would not
/// get shorter that way is returned unchanged.
pub fn truncate(text: &str, max_lines: usize, keep_lines: usize) -> Cow<'_, str> {
    let total = text.lines().count();
    if total <= max_lines || total <= keep_lines.saturating_mul(2).saturating_add(1) {
        return Cow::Borrowed(text);
    }

    let elided = total - 2 * keep_lines;
    let mut out: Vec<&str> = Vec::with_capacity(2 * keep_lines + 1);
    out.extend(text.lines().take(keep_lines));
    let marker = format!("... [{} lines truncated, {} lines total] ...", elided, total);
    out.push(&marker);
    out.extend(text.lines().skip(total - keep_lines));

    Cow::Owned(out.join("\n"))
}

/// Both sides of a diff after independent truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncatedDiff<'a> {
    pub old: Option<Cow<'a, str>>,
    pub new: Option<Cow<'a, str>>,
}

impl TruncatedDiff<'_> {
    pub fn is_truncated(&self) -> bool {
        matches!(self.old, Some(Cow::Owned(_))) || matches!(self.new, Some(Cow::Owned(_)))
    }
}

/// Truncate the old and new sides separately, each against its own length
pub fn truncate_diff<'a>(
    old: Option<&'a str>,
    new: Option<&'a str>,
    policy: &TruncationPolicy,
) -> TruncatedDiff<'a> {
    TruncatedDiff { old: old.map(|text| policy.apply(text)), new: new.map(|text| policy.apply(text)) }
}
