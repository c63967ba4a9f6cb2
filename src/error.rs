//! Typed errors for contract violations in the view engine.
//!
//! Data-shape problems (unrecognized content, dangling parent references, malformed
//! tool envelopes) are absorbed where they occur and never show up here. Only
//! programming/config mistakes are reported: an export format or view level the
//! engine does not know about, or a serializer failure.

/// Errors surfaced to callers of the engine.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("Unsupported export format: '{format}' (expected json, csv or markdown)")]
    UnsupportedFormat { format: String },

    #[error("Invalid view level: '{level}' (expected full, clean_flow or qa_pairs)")]
    InvalidViewLevel { level: String },

    #[error("Invalid sort order: '{order}' (expected asc or desc)")]
    InvalidSortOrder { order: String },

    #[error("Failed to serialize export: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_names_the_format() {
        let err = ViewerError::UnsupportedFormat { format: "xml".to_string() };
        assert!(err.to_string().contains("'xml'"));
    }

    #[test]
    fn test_invalid_view_level_names_the_level() {
        let err = ViewerError::InvalidViewLevel { level: "everything".to_string() };
        assert!(err.to_string().contains("everything"));
    }
}
