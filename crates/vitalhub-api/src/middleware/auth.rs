//! Authentication middleware: resolves the bearer token into a typed
//! [`Identity`] on the request extensions.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use vitalhub_core::error::AppError;

use crate::auth::Identity;
use crate::state::AppState;

/// Rejects requests without a valid bearer token; on success attaches
/// the resolved [`Identity`] for downstream extractors and middleware.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        return AppError::unauthorized("Missing bearer token").into_response();
    };

    match state.token_decoder.decode(token) {
        Ok(claims) => {
            request.extensions_mut().insert(Identity::from(claims));
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}
