//! Domain types for tooltrack
//!
//! - Tool: the persisted record with identity, status and custody metadata
//! - ToolData / ToolDraft: creation payload and its unvalidated model-output form
//! - ToolStatus / Direction: the three-state lifecycle

pub mod status;
pub mod tool;

pub use status::{Direction, ToolStatus};
pub use tool::{MissingField, Tool, ToolData, ToolDraft};
