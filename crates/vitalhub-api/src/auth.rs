//! Access token decoding and the request identity value.
//!
//! Token issuance lives in an external authentication service; this
//! module only verifies inbound bearer tokens and turns their claims
//! into the request-scoped [`Identity`].

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use vitalhub_core::config::auth::AuthConfig;
use vitalhub_core::error::{AppError, ErrorKind};
use vitalhub_core::result::AppResult;
use vitalhub_entity::user::UserRole;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID, as issued.
    pub sub: String,
    /// User email.
    pub email: String,
    /// User role at issuance time.
    pub role: UserRole,
    /// Expiry (seconds since epoch).
    pub exp: usize,
}

/// The authenticated principal, resolved once per request by the auth
/// middleware and attached to the request extensions.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Numeric user ID, when the subject claim parses as one.
    pub user_id: Option<i64>,
    /// Principal identifier used as the audit actor (email).
    pub subject: String,
    /// Role at token issuance.
    pub role: UserRole,
}

/// Verifies HS256 access tokens.
#[derive(Clone)]
pub struct TokenDecoder {
    key: DecodingKey,
    validation: Validation,
}

impl TokenDecoder {
    /// Create a decoder from the auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Decode and validate an access token.
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                AppError::with_source(ErrorKind::Authentication, "Invalid or expired token", e)
            })
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub.parse().ok(),
            subject: claims.email,
            role: claims.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
        }
    }

    fn token(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims() -> Claims {
        Claims {
            sub: "7".to_string(),
            email: "admin@example.com".to_string(),
            role: UserRole::Admin,
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        }
    }

    #[test]
    fn decodes_valid_token_into_identity() {
        let decoder = TokenDecoder::new(&config());
        let decoded = decoder.decode(&token(&claims(), "test-secret")).unwrap();
        let identity = Identity::from(decoded);
        assert_eq!(identity.user_id, Some(7));
        assert_eq!(identity.subject, "admin@example.com");
        assert!(identity.role.is_admin());
    }

    #[test]
    fn rejects_token_with_wrong_secret() {
        let decoder = TokenDecoder::new(&config());
        assert!(decoder.decode(&token(&claims(), "other-secret")).is_err());
    }
}
