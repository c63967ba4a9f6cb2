//! Terminal output sanitization utilities
//!
//! # Security: Terminal Injection Prevention
//!
//! Message content comes straight from session files and may carry ANSI escape sequences
//! that clear the screen, move the cursor or recolor the terminal. Every CLI command that
//! prints message text passes it through [`strip_ansi_codes`] first. Exported documents
//! are written verbatim.

/// Strips ANSI escape codes and stray control characters from a string
///
/// CSI sequences (`ESC [ ... letter`) are dropped whole. Other control characters are
/// removed too, except tab, newline and carriage return.
///
/// # Examples
///
/// ```
/// use ai_session_viewer::utils::terminal::strip_ansi_codes;
///
/// let text = "\x1b[31mRed text\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "Red text");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for next_ch in chars.by_ref() {
                if next_ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }

        if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            continue;
        }

        result.push(ch);
    }

    result
}

/// Sanitize for display and flatten to one line, for tree and table output
pub fn single_line(text: &str) -> String {
    strip_ansi_codes(text).split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_color_codes() {
        let text = "\x1b[1m\x1b[31mBold Red\x1b[0m\x1b[32m Green\x1b[0m";
        assert_eq!(strip_ansi_codes(text), "Bold Red Green");
    }

    #[test]
    fn test_strip_cursor_movement() {
        assert_eq!(strip_ansi_codes("\x1b[2J\x1b[H Cleared screen"), " Cleared screen");
    }

    #[test]
    fn test_strip_bell_and_backspace() {
        assert_eq!(strip_ansi_codes("Alert! \x07Test\x08"), "Alert! Test");
    }

    #[test]
    fn test_keeps_whitespace_and_unicode() {
        let text = "Line 1\nLine 2\rLine 3\tTabbed 👋";
        assert_eq!(strip_ansi_codes(text), text);
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("  first\n\n\x1b[31msecond\x1b[0m\tthird "), "first second third");
        assert_eq!(single_line(""), "");
    }
}
