pub mod request;

pub use request::{AuditListQuery, CreateUserRequest, UpdateUserRequest};
