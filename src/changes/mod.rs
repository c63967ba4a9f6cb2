//! Code changes recovered from tool-invocation envelopes.
//!
//! Assistant messages carry tool calls shaped like `{"name": ..., "input": {...}}`, either as
//! structured content parts or embedded in free text. Write/create calls become `create`
//! changes, edit/update calls become `update` changes, delete calls become `delete` changes.
//! Anything else is ignored; envelopes that fail to parse are skipped without stopping the scan.

pub mod extractor;
pub mod stats;

pub use extractor::{extract_changes_from_content, extract_code_changes};
pub use stats::calculate_change_statistics;
