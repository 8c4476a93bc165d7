//! Tool lifecycle manager
//!
//! Decides what a move does to a tool and pushes the result to the store.
//! Moves only ever touch `status`; the persisted record keeps its id and
//! every other field.

use crate::domain::{Direction, Tool, ToolStatus};
use crate::error::Result;
use crate::storage::ToolStore;

/// A status change the store needs to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    pub tool_id: String,
    pub from: ToolStatus,
    pub to: ToolStatus,
}

impl TransitionRequest {
    /// Plan the move of `tool` in `direction`
    ///
    /// Returns `None` when the move is a no-op (forward from InRepair,
    /// backward from InStock).
    pub fn plan(tool: &Tool, direction: Direction) -> Option<Self> {
        if !tool.status.can_move(direction) {
            return None;
        }
        Some(Self {
            tool_id: tool.id.clone(),
            from: tool.status,
            to: tool.status.step(direction),
        })
    }

    /// The record as it should look after the transition
    pub fn apply(&self, tool: &Tool) -> Tool {
        debug_assert_eq!(tool.id, self.tool_id);
        tool.with_status(self.to)
    }
}

/// Move `tool` one step in `direction`, persisting through `store`
///
/// Returns the updated record, or `None` if nothing changed. No-op moves
/// never reach the store.
pub async fn move_tool(store: &dyn ToolStore, tool: &Tool, direction: Direction) -> Result<Option<Tool>> {
    let Some(request) = TransitionRequest::plan(tool, direction) else {
        tracing::debug!(tool_id = %tool.id, status = %tool.status, ?direction, "Move is a no-op");
        return Ok(None);
    };

    let updated = store.update(&request.apply(tool)).await?;
    tracing::info!(
        tool_id = %request.tool_id,
        from = %request.from,
        to = %request.to,
        "Tool moved"
    );
    Ok(Some(updated))
}
