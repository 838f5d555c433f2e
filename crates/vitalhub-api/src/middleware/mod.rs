//! Axum middleware stack.

pub mod audit;
pub mod auth;
pub mod capture;
pub mod cors;
pub mod logging;
pub mod rbac;
