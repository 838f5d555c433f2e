//! Liveness endpoint.

use axum::Json;
use axum::extract::State;
use serde_json::json;

use vitalhub_core::error::{AppError, ErrorKind};
use vitalhub_core::result::AppResult;

use crate::state::AppState;

/// Reports service health, including database reachability.
pub async fn health(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    sqlx::query("SELECT 1")
        .execute(&state.db_pool)
        .await
        .map_err(|err| {
            AppError::with_source(ErrorKind::ServiceUnavailable, "Database unreachable", err)
        })?;

    Ok(Json(json!({ "status": "ok" })))
}
