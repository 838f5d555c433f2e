//! Audit event entity model.
//!
//! Audit events form an append-only ledger: once written they are never
//! updated or deleted through the application API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An immutable record of an administratively relevant action.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditEvent {
    /// Surrogate key, assigned at persistence time.
    pub id: i64,
    /// Identifier of the authenticated principal (email or subject).
    pub actor: String,
    /// Dotted `resource.verb` taxonomy string (e.g. `"user.create"`).
    pub action: String,
    /// The resource class the action applied to (e.g. `"user"`).
    pub target_type: String,
    /// The target resource ID; absent for system-level actions.
    pub target_id: Option<i64>,
    /// Sanitized contextual metadata (JSON object).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Server-assigned timestamp at write time.
    pub created_at: DateTime<Utc>,
}

/// Data required to record a new audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditEvent {
    /// The authenticated principal performing the action.
    pub actor: String,
    /// Dotted `resource.verb` action string.
    pub action: String,
    /// Target resource class.
    pub target_type: String,
    /// Target resource ID, when known.
    pub target_id: Option<i64>,
    /// Sanitized contextual metadata. Keys on the sensitive-field
    /// denylist must already be removed by the capture stage.
    pub details: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Pagination and filter parameters for the audit event listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditListParams {
    /// Requested page number.
    pub page: Option<i64>,
    /// Requested page size.
    pub page_size: Option<i64>,
    /// Case-insensitive partial match on actor.
    pub actor: Option<String>,
    /// Exact action match.
    pub action: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub end_date: Option<DateTime<Utc>>,
}
