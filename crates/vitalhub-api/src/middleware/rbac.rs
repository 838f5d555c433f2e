//! Role-based route guarding helpers.

use vitalhub_core::error::AppError;

use crate::extractors::AuthUser;

/// Checks that the authenticated user has the admin role.
pub fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    if !auth.role.is_admin() {
        return Err(AppError::forbidden("Admin access required"));
    }
    Ok(())
}
