//! Schema migrations, embedded at compile time.

use sqlx::PgPool;

use vitalhub_core::error::{AppError, ErrorKind};

/// Apply any migrations not yet recorded in the target database.
///
/// Safe to run on every startup; already-applied migrations are
/// skipped by the sqlx migrator.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|err| AppError::with_source(ErrorKind::Database, "Migration failed", err))?;

    tracing::info!("Database schema is up to date");
    Ok(())
}
