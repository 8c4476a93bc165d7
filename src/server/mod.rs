//! REST back end for the remote tool store
//!
//! `GET/POST /api/tools`, `PUT/DELETE /api/tools/{id}` over a single
//! SQLite table.

pub mod db;
pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get, routing::put};
use tokio::net::TcpListener;

pub use db::{TableError, ToolTable};
pub use error::ApiError;

/// Build the API router over `table`
pub fn router(table: Arc<ToolTable>) -> Router {
    Router::new()
        .route("/api/tools", get(handlers::list_tools).post(handlers::create_tool))
        .route(
            "/api/tools/{id}",
            put(handlers::update_tool).delete(handlers::delete_tool),
        )
        .with_state(table)
}

/// Serve the API on an already-bound listener until the task is dropped
pub async fn serve_on(listener: TcpListener, table: Arc<ToolTable>) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    log::info!("Tool API listening on http://{}", addr);
    axum::serve(listener, router(table)).await
}

/// Bind `addr` and serve the API
pub async fn serve(addr: SocketAddr, table: Arc<ToolTable>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, table).await
}
