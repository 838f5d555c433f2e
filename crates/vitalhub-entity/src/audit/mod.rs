//! Audit event entity and related types.

pub mod model;

pub use model::{AuditEvent, AuditListParams, NewAuditEvent};
