/// Lines kept in a collapsed message preview
pub const PREVIEW_MAX_LINES: usize = 10;

/// Characters kept in a collapsed message preview
pub const PREVIEW_MAX_CHARS: usize = 500;

const ELLIPSIS: char = '…';

/// Collapse `text` to at most `max_lines` lines and `max_chars` characters.
///
/// Returns `text` unchanged when it already fits, so comparing the preview with the full
/// text tells whether a "show more" affordance is needed.
pub fn preview(text: &str, max_lines: usize, max_chars: usize) -> String {
    let mut cut = false;

    let mut head = match text.match_indices('\n').nth(max_lines.saturating_sub(1)) {
        Some((idx, _)) if max_lines > 0 && !text[idx + 1..].trim().is_empty() => {
            cut = true;
            &text[..idx]
        }
        _ => text,
    };

    if let Some((idx, _)) = head.char_indices().nth(max_chars) {
        cut = true;
        head = &head[..idx];
    }

    if cut {
        let mut collapsed = head.trim_end().to_string();
        collapsed.push(ELLIPSIS);
        collapsed
    } else {
        text.to_string()
    }
}
