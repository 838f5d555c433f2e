//! Request payloads and query strings for the admin endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use validator::Validate;

use vitalhub_entity::audit::AuditListParams;
use vitalhub_entity::user::UserRole;

/// Payload for creating a user account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: UserRole,
}

/// Payload for a partial user update. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

/// Query string for the audit event listing.
///
/// Dates arrive as strings so both RFC 3339 timestamps and bare
/// `YYYY-MM-DD` dates are accepted; values that parse as neither are
/// dropped rather than rejected.
#[derive(Debug, Default, Deserialize)]
pub struct AuditListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub actor: Option<String>,
    pub action: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl AuditListQuery {
    /// Resolve the raw query into typed listing parameters.
    pub fn into_params(self) -> AuditListParams {
        AuditListParams {
            page: self.page,
            page_size: self.page_size,
            actor: self.actor,
            action: self.action,
            start_date: self.start_date.as_deref().and_then(parse_boundary_start),
            end_date: self.end_date.as_deref().and_then(parse_boundary_end),
        }
    }
}

/// Parses a range boundary; a bare date becomes midnight UTC.
fn parse_boundary_start(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = raw.parse::<DateTime<Utc>>() {
        return Some(ts);
    }
    let date = raw.parse::<NaiveDate>().ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

/// Parses a range boundary; a bare date covers the whole day, so it
/// resolves to the last second of that date.
fn parse_boundary_end(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = raw.parse::<DateTime<Utc>>() {
        return Some(ts);
    }
    let date = raw.parse::<NaiveDate>().ok()?;
    Some(date.and_hms_opt(23, 59, 59)?.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_boundaries_pass_through() {
        let query = AuditListQuery {
            start_date: Some("2024-03-01T08:30:00Z".to_string()),
            end_date: Some("2024-03-02T18:00:00Z".to_string()),
            ..Default::default()
        };
        let params = query.into_params();
        assert_eq!(
            params.start_date.unwrap().to_rfc3339(),
            "2024-03-01T08:30:00+00:00"
        );
        assert_eq!(
            params.end_date.unwrap().to_rfc3339(),
            "2024-03-02T18:00:00+00:00"
        );
    }

    #[test]
    fn bare_end_date_covers_the_whole_day() {
        let query = AuditListQuery {
            start_date: Some("2024-03-01".to_string()),
            end_date: Some("2024-03-01".to_string()),
            ..Default::default()
        };
        let params = query.into_params();
        assert_eq!(
            params.start_date.unwrap().to_rfc3339(),
            "2024-03-01T00:00:00+00:00"
        );
        assert_eq!(
            params.end_date.unwrap().to_rfc3339(),
            "2024-03-01T23:59:59+00:00"
        );
    }

    #[test]
    fn unparsable_dates_are_dropped() {
        let query = AuditListQuery {
            start_date: Some("yesterday".to_string()),
            end_date: Some("03/01/2024".to_string()),
            ..Default::default()
        };
        let params = query.into_params();
        assert!(params.start_date.is_none());
        assert!(params.end_date.is_none());
    }

    #[test]
    fn create_user_request_validates_email_and_password() {
        let bad = CreateUserRequest {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            role: UserRole::Clinician,
        };
        assert!(bad.validate().is_err());

        let good = CreateUserRequest {
            email: "nurse@clinic.example".to_string(),
            password: "long enough".to_string(),
            role: UserRole::Clinician,
        };
        assert!(good.validate().is_ok());
    }
}
