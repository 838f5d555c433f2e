//! Concrete repository implementations.

pub mod audit;
pub mod user;

pub use audit::{AuditEventRepository, AuditSink};
pub use user::UserRepository;
