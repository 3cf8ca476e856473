use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::role::Role;

/// Session token claims.
///
/// Every field is required: a token missing any of them fails to decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (identity identifier)
    pub sub: String,

    /// Role of the identity at issuance time
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for an identity, valid for `lifetime` from `issued_at`.
    pub fn for_identity(
        subject: impl ToString,
        role: Role,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        let expiration = issued_at + lifetime;

        Self {
            sub: subject.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Check if token is expired.
    ///
    /// A token is no longer valid from the instant of its expiry onward.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
