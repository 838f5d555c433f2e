//! # vitalhub-api
//!
//! HTTP API layer for VitalHub using Axum: application state, request
//! DTOs, extractors, the middleware stack (request logging, auth, body
//! capture, audit recording), admin handlers, and the router.

pub mod app;
pub mod auth;
pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
