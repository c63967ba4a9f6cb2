use crate::models::{MessageKind, Role};
use crate::tree::MessageNode;

/// How an assistant node was judged interim or final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThinkingClass {
    /// The record carried an explicit marker; authoritative
    Marked(bool),
    /// No marker; judged by empty-after-trim text
    Heuristic(bool),
}

impl ThinkingClass {
    pub fn is_thinking(self) -> bool {
        match self {
            ThinkingClass::Marked(thinking) | ThinkingClass::Heuristic(thinking) => thinking,
        }
    }

    pub fn is_heuristic(self) -> bool {
        matches!(self, ThinkingClass::Heuristic(_))
    }
}

/// Classify an assistant node. Other roles return `None`.
///
/// The upstream marker always wins, so a short final answer marked `final` is kept even
/// if it is blank. Unmarked records fall back to the empty-text check; callers can flag
/// those through [`ThinkingClass::is_heuristic`].
pub fn classify_thinking(node: &MessageNode) -> Option<ThinkingClass> {
    if node.role() != Role::Assistant {
        return None;
    }

    Some(match node.record().kind {
        Some(kind) => ThinkingClass::Marked(kind == MessageKind::Thinking),
        None => ThinkingClass::Heuristic(node.extracted_full_text().trim().is_empty()),
    })
}

/// Whether `node` is an interim assistant fragment
pub fn is_interim(node: &MessageNode) -> bool {
    classify_thinking(node).is_some_and(ThinkingClass::is_thinking)
}
