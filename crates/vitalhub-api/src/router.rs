//! Route table and middleware layering.
//!
//! Layer order on the protected tree, outermost first: request
//! logging, CORS, tracing, body limit, then authentication, body
//! capture, and finally the per-route audit recorder. The recorder is
//! attached with `route_layer` so only the mutating user routes pay
//! for it, each with its own action mapping.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::handlers::admin::audit::list_audit_events;
use crate::handlers::admin::users::{
    activate_user, create_user, deactivate_user, get_user, list_users, update_user,
};
use crate::handlers::health::health;
use crate::middleware::audit::{AuditConfig, record_action};
use crate::middleware::auth::require_auth;
use crate::middleware::capture::capture_request_body;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::state::AppState;

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    let audit = |action, target_type| {
        middleware::from_fn_with_state(
            AuditConfig::new(state.audit_sink.clone(), action, target_type),
            record_action,
        )
    };

    let admin = Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/users/{id}", get(get_user))
        .route("/admin/audit", get(list_audit_events))
        .merge(
            Router::new()
                .route("/admin/users", post(create_user))
                .route_layer(audit("user.create", "user")),
        )
        .merge(
            Router::new()
                .route("/admin/users/{id}", put(update_user))
                .route_layer(audit("user.update", "user")),
        )
        .merge(
            Router::new()
                .route("/admin/users/{id}", delete(deactivate_user))
                .route_layer(audit("user.deactivate", "user")),
        )
        .merge(
            Router::new()
                .route("/admin/users/{id}/activate", post(activate_user))
                .route_layer(audit("user.activate", "user")),
        )
        .layer(middleware::from_fn_with_state(
            state.config.server.max_body_bytes,
            capture_request_body,
        ))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/api/health", get(health))
        .nest("/api", admin)
        .layer(DefaultBodyLimit::max(state.config.server.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state.config.server))
        .layer(middleware::from_fn(request_logging))
        .with_state(state)
}
