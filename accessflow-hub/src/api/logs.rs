//! Live access log endpoint

use accessflow_common::models::AccessEvent;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    /// Maximum entries to return, newest first
    pub limit: Option<usize>,
}

/// GET /logs
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> Json<Vec<AccessEvent>> {
    let entries = match query.limit {
        Some(n) => state.log_buffer.recent(n).await,
        None => state.log_buffer.snapshot().await,
    };
    Json(entries)
}

/// Build access log routes
pub fn log_routes() -> Router<AppState> {
    Router::new().route("/logs", get(list_logs))
}
