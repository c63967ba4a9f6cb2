//! Conversation tree construction.
//!
//! Records reference their parent by id. [`build_tree`] links them into a forest stored
//! as an arena: nodes live in one `Vec` and refer to each other by [`NodeId`], so there
//! are no owning back-pointers. A tree is rebuilt for every request and never mutated
//! afterwards; filters and exporters only borrow it.
//!
//! # Error Handling Strategy
//!
//! Building never fails. A parent id that does not resolve (or points at the record
//! itself) turns the record into a root. Parent chains that loop back on themselves are
//! broken at their earliest record, which also becomes a root. Duplicate ids are
//! accepted; the last record with a given id wins parent lookups.

pub mod builder;
pub mod node;
pub mod source;

pub use builder::{ConversationTree, build_tree};
pub use node::{MessageNode, NodeId};
pub use source::{NestedNode, TreeSource};
