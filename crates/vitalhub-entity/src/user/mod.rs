//! User entity and related types.

pub mod model;
pub mod role;

pub use model::{CreateUser, UpdateUser, User, UserListParams};
pub use role::UserRole;
