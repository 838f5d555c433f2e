//! Server bootstrap.

use vitalhub_core::error::{AppError, ErrorKind};
use vitalhub_core::result::AppResult;

use crate::router::build_router;
use crate::state::AppState;

/// Binds the configured address and serves the application router
/// until the process is stopped.
pub async fn run_server(state: AppState) -> AppResult<()> {
    let addr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|err| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to bind {addr}"),
                err,
            )
        })?;

    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, build_router(state))
        .await
        .map_err(|err| AppError::with_source(ErrorKind::Internal, "Server error", err))
}
