//! Storage trait definition for tool records.

use async_trait::async_trait;

use crate::domain::{Tool, ToolData};
use crate::error::Result;

/// CRUD interface over the tool collection.
///
/// Implementations are independent round trips with no transaction
/// semantics. Callers must not depend on which backend is active.
#[async_trait]
pub trait ToolStore: Send + Sync {
    /// All tools, most recently created first.
    async fn list(&self) -> Result<Vec<Tool>>;

    /// Persist a new tool built from `data`. The store assigns the id and
    /// the tool always starts in stock.
    async fn create(&self, data: ToolData) -> Result<Tool>;

    /// Replace the record with `tool.id`. Returns the stored record.
    async fn update(&self, tool: &Tool) -> Result<Tool>;

    /// Remove the record with `id`.
    async fn delete(&self, id: &str) -> Result<()>;
}
