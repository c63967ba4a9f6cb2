//! View levels over a conversation tree.
//!
//! - [`ViewLevel::Full`]: every node, depth-first, parents before children
//! - [`ViewLevel::CleanFlow`]: the same walk without system/tool records and without interim
//!   assistant reasoning
//! - [`ViewLevel::QaPairs`]: each user question paired with the assistant reply that closes it
//!
//! Filtering only borrows the tree. The optional display sort is applied afterwards, so QA
//! pairing always sees ingestion order.
//!
//! [`ViewLevel::Full`]: crate::models::ViewLevel::Full
//! [`ViewLevel::CleanFlow`]: crate::models::ViewLevel::CleanFlow
//! [`ViewLevel::QaPairs`]: crate::models::ViewLevel::QaPairs

pub mod cache;
pub mod filter;
pub mod qa;
pub mod stats;
pub mod thinking;

pub use cache::ViewCache;
pub use filter::{FilteredView, ViewEntries, filter_by_level, filter_entries, sort_entries};
pub use qa::{QaPair, QaRecordPair, pair_questions};
pub use stats::ViewStatistics;
pub use thinking::{ThinkingClass, classify_thinking, is_interim};
