//! Admin audit trail endpoint.

use axum::Json;
use axum::extract::{Query, State};

use vitalhub_core::result::AppResult;
use vitalhub_core::types::pagination::Page;
use vitalhub_entity::audit::AuditEvent;

use crate::dto::AuditListQuery;
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// Lists audit events, newest first, with optional actor, action, and
/// date range filters.
pub async fn list_audit_events(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AuditListQuery>,
) -> AppResult<Json<Page<AuditEvent>>> {
    require_admin(&auth)?;
    let page = state.audit_repo.list(&query.into_params()).await?;
    Ok(Json(page))
}
