//! Size bounds for large diffs and content blocks.

pub mod truncate;

pub use truncate::{
    DEFAULT_KEEP_LINES, DEFAULT_MAX_LINES, TruncatedDiff, TruncationPolicy, truncate, truncate_diff,
};
