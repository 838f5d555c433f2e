//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::role::UserRole;

/// A registered user account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Login email, unique.
    pub email: String,
    /// Argon2 password hash. Never serialized into responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// User role.
    pub role: UserRole,
    /// Whether the account can log in.
    pub is_active: bool,
    /// Last successful login time.
    pub last_login_at: Option<DateTime<Utc>>,
    /// The admin who created this account.
    pub created_by: Option<i64>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Login email.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Assigned role.
    pub role: UserRole,
    /// Creating admin's user ID.
    pub created_by: Option<i64>,
}

/// Partial update of an existing user. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    /// New email address.
    pub email: Option<String>,
    /// New role.
    pub role: Option<UserRole>,
}

/// Pagination and filter parameters for the user listing.
///
/// Empty-string filters mean "not requested" and are dropped before the
/// query is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserListParams {
    /// Requested page number.
    pub page: Option<i64>,
    /// Requested page size.
    pub page_size: Option<i64>,
    /// Case-insensitive partial match on email.
    pub search: Option<String>,
    /// Exact role match.
    pub role: Option<String>,
    /// Active-status match. Empty or unparsable values mean
    /// "not requested", like the string filters.
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_active: Option<bool>,
}

/// Deserializes a query-string boolean, treating empty or malformed
/// input as an absent filter rather than a request error.
fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse::<bool>().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_active_filter_is_treated_as_absent() {
        let params: UserListParams =
            serde_json::from_str(r#"{"search":"x","is_active":""}"#).unwrap();
        assert_eq!(params.is_active, None);

        let params: UserListParams =
            serde_json::from_str(r#"{"is_active":"true"}"#).unwrap();
        assert_eq!(params.is_active, Some(true));

        let params: UserListParams =
            serde_json::from_str(r#"{"is_active":"banana"}"#).unwrap();
        assert_eq!(params.is_active, None);
    }
}
