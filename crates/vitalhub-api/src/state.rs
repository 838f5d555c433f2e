//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::PgPool;

use vitalhub_core::config::AppConfig;
use vitalhub_database::repositories::audit::{AuditEventRepository, AuditSink};
use vitalhub_database::repositories::user::UserRepository;

use crate::auth::TokenDecoder;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// Access token verifier.
    pub token_decoder: Arc<TokenDecoder>,
    /// User repository.
    pub user_repo: Arc<UserRepository>,
    /// Audit event repository (read side).
    pub audit_repo: Arc<AuditEventRepository>,
    /// Audit write sink consumed by the audit middleware.
    pub audit_sink: Arc<dyn AuditSink>,
}

impl AppState {
    /// Wire up state from configuration and a connected pool.
    pub fn new(config: AppConfig, db_pool: PgPool) -> Self {
        let token_decoder = Arc::new(TokenDecoder::new(&config.auth));
        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let audit_repo = Arc::new(AuditEventRepository::new(db_pool.clone()));
        let audit_sink: Arc<dyn AuditSink> = audit_repo.clone();

        Self {
            config: Arc::new(config),
            db_pool,
            token_decoder,
            user_repo,
            audit_repo,
            audit_sink,
        }
    }
}
