use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Filtering granularity applied to a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewLevel {
    /// Every record, verbatim
    #[default]
    Full,
    /// User and assistant records only, interim reasoning removed
    CleanFlow,
    /// One entry per user question with its final assistant answer
    QaPairs,
}

impl ViewLevel {
    pub const ALL: [ViewLevel; 3] = [ViewLevel::Full, ViewLevel::CleanFlow, ViewLevel::QaPairs];

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewLevel::Full => "full",
            ViewLevel::CleanFlow => "clean_flow",
            ViewLevel::QaPairs => "qa_pairs",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewLevel::Full => "Full",
            ViewLevel::CleanFlow => "Clean Flow",
            ViewLevel::QaPairs => "Q&A Pairs",
        }
    }
}

impl fmt::Display for ViewLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewLevel {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "full" => Ok(ViewLevel::Full),
            "clean" | "clean_flow" | "cleanflow" => Ok(ViewLevel::CleanFlow),
            "qa" | "qa_pairs" | "qapairs" => Ok(ViewLevel::QaPairs),
            _ => Err(ViewerError::InvalidViewLevel { level: s.to_string() }),
        }
    }
}

/// Display order toggle, applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortOrder {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(ViewerError::InvalidSortOrder { order: s.to_string() }),
        }
    }
}
