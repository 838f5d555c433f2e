//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration.
///
/// Token issuance lives in an external service; this configuration only
/// covers what is needed to verify inbound access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared secret used to verify HS256 access tokens.
    pub jwt_secret: String,
}
