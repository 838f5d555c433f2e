//! Audit recording middleware.
//!
//! Wraps a mutating route and, once the handler has completed, decides
//! exactly once whether to record an audit event. The decision is
//! log-or-skip; it is never revisited within the request, and the
//! outcome of the audit write never changes the HTTP response.

use std::sync::Arc;

use axum::body::{Body, HttpBody};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use vitalhub_core::types::response::RequestAborted;
use vitalhub_database::repositories::audit::AuditSink;
use vitalhub_entity::audit::NewAuditEvent;

use crate::auth::Identity;
use crate::middleware::capture::CapturedBody;

/// Response bodies above this size, or of unknown size (streaming),
/// are forwarded without scanning for a target ID.
const RESPONSE_SCAN_LIMIT: u64 = 1024 * 1024;

/// Static action mapping for one route.
#[derive(Debug, Clone, Copy)]
pub struct AuditRoute {
    /// Dotted `resource.verb` action string (e.g. `"user.create"`).
    pub action: &'static str,
    /// Resource class the route operates on (e.g. `"user"`).
    pub target_type: &'static str,
}

/// Per-route middleware state: the action mapping plus the sink to
/// record through. Supplied explicitly by the router, never global.
#[derive(Clone)]
pub struct AuditConfig {
    /// Where events are written.
    pub sink: Arc<dyn AuditSink>,
    /// The route's action mapping.
    pub route: AuditRoute,
}

impl AuditConfig {
    /// Create the audit configuration for one route.
    pub fn new(sink: Arc<dyn AuditSink>, action: &'static str, target_type: &'static str) -> Self {
        Self {
            sink,
            route: AuditRoute {
                action,
                target_type,
            },
        }
    }
}

/// Records an audit event after the wrapped handler completes
/// successfully with a resolved identity.
pub async fn record_action(
    State(config): State<AuditConfig>,
    request: Request,
    next: Next,
) -> Response {
    // Snapshot request-scoped values before the handler consumes the
    // request.
    let identity = request.extensions().get::<Identity>().cloned();
    let captured = request.extensions().get::<CapturedBody>().cloned();

    let response = next.run(request).await;

    // Aborted or failed requests leave no trace.
    if response.extensions().get::<RequestAborted>().is_some()
        || !response.status().is_success()
    {
        return response;
    }

    // Anonymous requests never produce an audit record.
    let Some(identity) = identity else {
        return response;
    };

    // Buffer the response body so the target ID can be read from it,
    // then restore it for the client. Bodies that are too large or of
    // unknown size skip the scan; the event is still recorded.
    let (parts, body) = response.into_parts();
    let scannable = body
        .size_hint()
        .upper()
        .is_some_and(|size| size <= RESPONSE_SCAN_LIMIT);
    let (body, target_id) = if scannable {
        match axum::body::to_bytes(body, RESPONSE_SCAN_LIMIT as usize).await {
            Ok(bytes) => {
                let target_id = serde_json::from_slice::<serde_json::Value>(&bytes)
                    .ok()
                    .and_then(|value| value.get("id").and_then(|id| id.as_i64()));
                (Body::from(bytes), target_id)
            }
            Err(_) => (Body::empty(), None),
        }
    } else {
        (body, None)
    };

    let event = NewAuditEvent {
        actor: identity.subject,
        action: config.route.action.to_owned(),
        target_type: config.route.target_type.to_owned(),
        target_id,
        details: captured.map(|c| (*c.0).clone()),
    };

    if let Err(err) = config.sink.record(event).await {
        tracing::warn!(
            action = config.route.action,
            error = %err,
            "Failed to record audit event"
        );
    }

    Response::from_parts(parts, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router, middleware};
    use serde_json::json;
    use std::sync::Mutex;
    use tower::ServiceExt;

    use vitalhub_core::error::AppError;
    use vitalhub_core::result::AppResult;
    use vitalhub_entity::user::UserRole;

    use crate::middleware::capture::capture_request_body;

    #[derive(Debug, Default)]
    struct MockSink {
        events: Mutex<Vec<NewAuditEvent>>,
    }

    #[async_trait]
    impl AuditSink for MockSink {
        async fn record(&self, event: NewAuditEvent) -> AppResult<()> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    #[derive(Debug)]
    struct FailingSink;

    #[async_trait]
    impl AuditSink for FailingSink {
        async fn record(&self, _event: NewAuditEvent) -> AppResult<()> {
            Err(AppError::database("connection refused"))
        }
    }

    fn admin_identity() -> Identity {
        Identity {
            user_id: Some(1),
            subject: "admin@example.com".to_string(),
            role: UserRole::Admin,
        }
    }

    /// Builds the production layering for one audited route: identity
    /// resolution outermost, then body capture, then the recorder.
    fn audited_app<H, T>(sink: Arc<dyn AuditSink>, handler: H, with_identity: bool) -> Router
    where
        H: axum::handler::Handler<T, ()>,
        T: 'static,
    {
        let router = Router::new()
            .route("/users", post(handler))
            .route_layer(middleware::from_fn_with_state(
                AuditConfig::new(sink, "user.create", "user"),
                record_action,
            ))
            .layer(middleware::from_fn_with_state(
                1024 * 1024,
                capture_request_body,
            ));

        if with_identity {
            router.layer(middleware::from_fn(
                |mut request: axum::extract::Request, next: Next| async move {
                    request.extensions_mut().insert(admin_identity());
                    next.run(request).await
                },
            ))
        } else {
            router
        }
    }

    fn post_json(payload: &str) -> Request<Body> {
        Request::post("/users")
            .header("content-type", "application/json")
            .body(Body::from(payload.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn successful_mutation_records_one_sanitized_event() {
        let sink = Arc::new(MockSink::default());
        let app = audited_app(
            sink.clone(),
            || async { Json(json!({ "id": 123, "email": "x@y.com" })) },
            true,
        );

        let response = app
            .oneshot(post_json(r#"{"name":"x","password":"secret"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // The response body survives the scan.
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["id"], 123);

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.action, "user.create");
        assert_eq!(event.target_type, "user");
        assert_eq!(event.actor, "admin@example.com");
        assert_eq!(event.target_id, Some(123));
        let details = event.details.as_ref().unwrap();
        assert_eq!(details.get("name"), Some(&json!("x")));
        assert!(!details.contains_key("password"));
    }

    #[tokio::test]
    async fn failed_request_records_nothing() {
        let sink = Arc::new(MockSink::default());
        let app = audited_app(
            sink.clone(),
            || async { (StatusCode::BAD_REQUEST, "invalid") },
            true,
        );

        let response = app
            .oneshot(post_json(r#"{"name":"x"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn aborted_request_records_nothing() {
        let sink = Arc::new(MockSink::default());
        let app = audited_app(
            sink.clone(),
            || async { Err::<Json<serde_json::Value>, _>(AppError::forbidden("admin only")) },
            true,
        );

        let response = app
            .oneshot(post_json(r#"{"name":"x"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn anonymous_request_records_nothing() {
        let sink = Arc::new(MockSink::default());
        let app = audited_app(
            sink.clone(),
            || async { Json(json!({ "id": 1 })) },
            false,
        );

        let response = app
            .oneshot(post_json(r#"{"name":"x"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn body_without_id_records_event_without_target() {
        let sink = Arc::new(MockSink::default());
        let app = audited_app(
            sink.clone(),
            || async { Json(json!({ "message": "done" })) },
            true,
        );

        app.oneshot(post_json(r#"{"name":"x"}"#)).await.unwrap();

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target_id, None);
    }

    #[tokio::test]
    async fn oversized_response_is_forwarded_whole_and_still_audited() {
        let sink = Arc::new(MockSink::default());
        let size = 2 * 1024 * 1024;
        let app = audited_app(
            sink.clone(),
            move || async move { vec![b'a'; size] },
            true,
        );

        let response = app
            .oneshot(post_json(r#"{"name":"x"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // The client gets every byte even though the scan was skipped.
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes.len(), size);

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].target_id, None);
    }

    #[tokio::test]
    async fn sink_failure_leaves_the_response_untouched() {
        let app = audited_app(
            Arc::new(FailingSink),
            || async { Json(json!({ "id": 9 })) },
            true,
        );

        let response = app
            .oneshot(post_json(r#"{"name":"x"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["id"], 9);
    }
}
