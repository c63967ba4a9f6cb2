//! Data models for conversation records and their derived views.
//!
//! - [`Record`] - one raw turn as handed over by the backend
//! - [`ViewLevel`] / [`SortOrder`] - how a conversation is filtered and ordered
//! - [`CodeChangeInfo`] / [`ChangeStatistics`] - file changes recovered from tool calls
//! - [`SessionInfo`] - export header metadata
//!
//! Timestamps and the interim marker use custom deserializers from
//! [`crate::parsers::deserializers`].

pub mod change;
pub mod record;
pub mod session;
pub mod view;

pub use change::{ChangeStatistics, ChangeType, CodeChangeInfo};
pub use record::{MessageKind, Record, Role};
pub use session::SessionInfo;
pub use view::{SortOrder, ViewLevel};
