//! Audit event repository.
//!
//! The `audit_events` table is an append-only ledger: this repository
//! exposes no update or delete operations, by construction.

use async_trait::async_trait;
use sqlx::PgPool;

use vitalhub_core::error::{AppError, ErrorKind};
use vitalhub_core::result::AppResult;
use vitalhub_core::types::pagination::{Page, PageRequest};
use vitalhub_entity::audit::{AuditEvent, AuditListParams, NewAuditEvent};

use crate::query::ListQueryBuilder;

/// Write-side seam for audit events.
///
/// The audit middleware records through this trait so tests can observe
/// writes without a database.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persist one audit event.
    async fn record(&self, event: NewAuditEvent) -> AppResult<()>;
}

/// Repository for audit events.
#[derive(Debug, Clone)]
pub struct AuditEventRepository {
    pool: PgPool,
}

impl AuditEventRepository {
    /// Create a new audit event repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist one audit event. `created_at` is assigned by the database.
    ///
    /// If the details map cannot be serialized, the event is still
    /// written with an empty details object; recording the action wins
    /// over preserving its context.
    pub async fn create(&self, event: &NewAuditEvent) -> AppResult<()> {
        let details = event.details.as_ref().map(|map| {
            serde_json::to_value(map).unwrap_or_else(|_| serde_json::json!({}))
        });

        sqlx::query(
            "INSERT INTO audit_events (actor, action, target_type, target_id, details, created_at) \
             VALUES ($1, $2, $3, $4, $5, NOW())",
        )
        .bind(&event.actor)
        .bind(&event.action)
        .bind(&event.target_type)
        .bind(event.target_id)
        .bind(details)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create audit event", e))?;

        Ok(())
    }

    /// List audit events with filters and pagination, newest first.
    ///
    /// The count and the page fetch share one predicate list, so `total`
    /// always reflects the unpaginated row count under the same filters.
    pub async fn list(&self, params: &AuditListParams) -> AppResult<Page<AuditEvent>> {
        let page = PageRequest::from_raw(params.page, params.page_size);

        let mut filters = ListQueryBuilder::new();
        if let Some(actor) = params.actor.as_deref().filter(|s| !s.is_empty()) {
            filters.contains("actor", actor);
        }
        if let Some(action) = params.action.as_deref().filter(|s| !s.is_empty()) {
            filters.equals("action", action);
        }
        if let Some(start) = params.start_date {
            filters.not_before("created_at", start);
        }
        if let Some(end) = params.end_date {
            filters.not_after("created_at", end);
        }

        let count_sql = filters.count_sql("audit_events");
        let page_sql = filters.page_sql(
            "audit_events",
            "id, actor, action, target_type, target_id, details, created_at",
            "created_at",
        );

        let total: i64 = filters
            .bind_count(sqlx::query_scalar(&count_sql))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count audit events", e)
            })?;

        let events = filters
            .bind_rows(sqlx::query_as::<_, AuditEvent>(&page_sql))
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list audit events", e)
            })?;

        Ok(Page::new(events, total, &page))
    }
}

#[async_trait]
impl AuditSink for AuditEventRepository {
    async fn record(&self, event: NewAuditEvent) -> AppResult<()> {
        self.create(&event).await
    }
}
