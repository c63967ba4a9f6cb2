//! Session file parsers
//!
//! # Error Handling Strategy
//!
//! Parsing follows a **graceful degradation** approach:
//!
//! - **Individual line failures**: Malformed JSON lines, and lines that are valid JSON but not a
//!   record (unknown role, missing id or timestamp), are logged with `tracing::warn!` and skipped.
//!
//! - **Catastrophic failure detection**: If >50% of lines fail to parse, or if 100 consecutive
//!   errors occur, the parser returns an error. This prevents accepting severely corrupted files.
//!
//! - **Error propagation**: Uses `anyhow::Result` with context. Callers report the error and move
//!   on; nothing matches on parse error types.

pub mod deserializers;
pub mod records;

pub use records::{parse_records, parse_records_file, parse_session_file};
