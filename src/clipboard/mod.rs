//! Copying exported documents to the system clipboard.

use anyhow::{Context, Result, bail};
use arboard::Clipboard;
use tracing::debug;

use crate::export::ExportedDocument;

/// Largest document placed on the clipboard (10MB)
const MAX_CLIPBOARD_SIZE: usize = 10 * 1024 * 1024;

/// Seam over the system clipboard so copying can be tested headless
trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        Ok(Self { clipboard })
    }
}

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).context("Failed to set clipboard contents")
    }
}

fn validate_clipboard_text(text: &str) -> Result<()> {
    if text.is_empty() {
        bail!("Cannot copy empty text to clipboard");
    }

    if text.len() > MAX_CLIPBOARD_SIZE {
        bail!("Text too large for clipboard ({} bytes, max {})", text.len(), MAX_CLIPBOARD_SIZE);
    }

    Ok(())
}

fn copy_with_provider(document: &ExportedDocument, provider: &mut dyn ClipboardProvider) -> Result<()> {
    validate_clipboard_text(&document.content)
        .with_context(|| format!("Cannot copy {}", document.filename))?;
    provider.set_text(&document.content)?;
    debug!(filename = %document.filename, bytes = document.content.len(), "Copied export to clipboard");
    Ok(())
}

/// Place an exported document's content on the system clipboard.
///
/// Content is validated before the clipboard is touched, so an empty or oversized
/// (>10MB) document fails the same way on headless machines.
///
/// # Errors
/// Returns error if:
/// - The document is empty or larger than 10MB
/// - The system clipboard is unavailable (headless environment, denied access)
pub fn copy_document(document: &ExportedDocument) -> Result<()> {
    validate_clipboard_text(&document.content)
        .with_context(|| format!("Cannot copy {}", document.filename))?;

    let mut clipboard = SystemClipboard::new()?;
    copy_with_provider(document, &mut clipboard)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockClipboard {
        text: Option<String>,
        should_fail: bool,
    }

    impl MockClipboard {
        fn new() -> Self {
            Self { text: None, should_fail: false }
        }
    }

    impl ClipboardProvider for MockClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if self.should_fail {
                bail!("Mock clipboard error");
            }
            self.text = Some(text.to_string());
            Ok(())
        }
    }

    fn document(content: impl Into<String>) -> ExportedDocument {
        ExportedDocument {
            filename: "Demo_2025-03-14.md".to_string(),
            content: content.into(),
            mime_type: "text/markdown",
        }
    }

    #[test]
    fn test_copy_document_with_mock() {
        let mut mock = MockClipboard::new();
        let doc = document("# Demo\n\n### User 世界 🚀\n");

        copy_with_provider(&doc, &mut mock).unwrap();
        assert_eq!(mock.text.as_deref(), Some(doc.content.as_str()));
    }

    #[test]
    fn test_provider_failure_propagates() {
        let mut mock = MockClipboard { text: None, should_fail: true };
        let err = copy_with_provider(&document("x"), &mut mock).unwrap_err();
        assert!(err.to_string().contains("Mock clipboard error"));
    }

    #[test]
    fn test_empty_document_rejected() {
        let mut mock = MockClipboard::new();
        let err = copy_with_provider(&document(""), &mut mock).unwrap_err();
        assert!(format!("{:#}", err).contains("empty"));
        assert!(err.to_string().contains("Demo_2025-03-14.md"));
        assert!(mock.text.is_none());
    }

    #[test]
    fn test_size_limit_counts_bytes() {
        let mut mock = MockClipboard::new();
        assert!(copy_with_provider(&document("a".repeat(MAX_CLIPBOARD_SIZE)), &mut mock).is_ok());

        // "🚀" is 4 bytes, so 3M of them exceed 10MB
        let err = copy_with_provider(&document("🚀".repeat(3 * 1024 * 1024)), &mut mock).unwrap_err();
        assert!(format!("{:#}", err).contains("too large"));
    }

    #[test]
    fn test_copy_document_validates_before_clipboard_access() {
        let err = copy_document(&document("")).unwrap_err();
        assert!(format!("{:#}", err).contains("empty"));
    }
}
