//! Request body capture middleware.
//!
//! Buffers a mutating request's JSON body, scrubs sensitive keys, and
//! attaches the sanitized map to the request extensions for the audit
//! recorder. The original body is restored unchanged, so downstream
//! handlers are unaffected. Decode failures are silent: the request
//! proceeds with nothing captured.
//!
//! The buffering bound is the server's configured body limit, supplied
//! as middleware state. A request declaring a body larger than that is
//! forwarded untouched; capture never truncates what the handler sees.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::CONTENT_LENGTH;
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Keys removed from captured bodies before they reach the audit trail.
///
/// Matching is exact and case-sensitive.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "password_hash",
    "token",
    "refresh_token",
    "access_token",
    "new_password",
    "current_password",
];

/// Sanitized request body, attached to the request extensions.
#[derive(Debug, Clone)]
pub struct CapturedBody(pub Arc<serde_json::Map<String, serde_json::Value>>);

/// Buffers and sanitizes the body of mutating requests.
///
/// `limit` is the server's maximum accepted body size in bytes.
pub async fn capture_request_body(
    State(limit): State<usize>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method();
    let mutating = method == Method::POST
        || method == Method::PUT
        || method == Method::PATCH
        || method == Method::DELETE;
    if !mutating {
        return next.run(request).await;
    }

    // A declared length above the limit means the handler (or its
    // extractors) will deal with the oversized body; do not consume it.
    let declared = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|len| len > limit) {
        return next.run(request).await;
    }

    let (mut parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        // An undeclared body that exceeds the server limit mid-stream.
        Err(_) => return StatusCode::PAYLOAD_TOO_LARGE.into_response(),
    };

    if let Ok(serde_json::Value::Object(mut map)) = serde_json::from_slice(&bytes) {
        for key in SENSITIVE_FIELDS {
            map.remove(*key);
        }
        parts.extensions.insert(CapturedBody(Arc::new(map)));
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
