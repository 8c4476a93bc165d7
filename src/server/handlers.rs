//! Tool API request handlers
//!
//! Each handler maps one REST call onto one `ToolTable` operation.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;

use super::db::{TableError, ToolTable};
use super::error::ApiError;
use crate::domain::{Tool, ToolData, ToolDraft, ToolStatus};

/// Shared handler state
pub type AppState = Arc<ToolTable>;

/// Body of `PUT /api/tools/{id}`; any `id` in the body is ignored
#[derive(Debug, Deserialize)]
pub struct UpdateToolBody {
    #[serde(flatten)]
    pub fields: ToolDraft,
    #[serde(default)]
    pub status: Option<ToolStatus>,
}

fn internal(e: TableError) -> ApiError {
    log::error!("Tool table error: {}", e);
    ApiError::internal(e.to_string())
}

fn validated(draft: ToolDraft) -> Result<ToolData, ApiError> {
    draft.validate().map_err(|e| ApiError::bad_request(e.to_string()))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// GET /api/tools
pub async fn list_tools(State(table): State<AppState>) -> Result<Json<Vec<Tool>>, ApiError> {
    match table.list() {
        Ok(tools) => Ok(Json(tools)),
        Err(TableError::Unavailable(e)) => {
            log::warn!("Tool table unavailable, returning empty list: {}", e);
            Ok(Json(Vec::new()))
        }
        Err(e) => Err(internal(e)),
    }
}

/// POST /api/tools - new tools always start in stock
pub async fn create_tool(
    State(table): State<AppState>,
    payload: Result<Json<ToolDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Tool>), ApiError> {
    let data = validated(body(payload)?)?;
    let tool = table.insert(data).map_err(internal)?;
    log::info!("Created tool {} ({})", tool.id, tool.name);
    Ok((StatusCode::CREATED, Json(tool)))
}

/// PUT /api/tools/{id}
pub async fn update_tool(
    State(table): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateToolBody>, JsonRejection>,
) -> Result<Json<Tool>, ApiError> {
    let UpdateToolBody { fields, status } = body(payload)?;
    let data = validated(fields)?;
    match table.update(&id, &data, status).map_err(internal)? {
        Some(tool) => Ok(Json(tool)),
        None => Err(ApiError::not_found(&id)),
    }
}

/// DELETE /api/tools/{id}
pub async fn delete_tool(State(table): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    if table.delete(&id).map_err(internal)? {
        log::info!("Deleted tool {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(&id))
    }
}
