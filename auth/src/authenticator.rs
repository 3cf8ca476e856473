use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::role::Role;

/// Default session token lifetime.
pub const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 24;

/// Authentication coordinator combining password verification and session tokens.
///
/// Holds the signing secret for the lifetime of the process. Token issuance and
/// verification touch no shared mutable state and may run concurrently.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_lifetime: Duration,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed session token
    pub access_token: String,
    /// Claims embedded in `access_token`
    pub claims: Claims,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator issuing tokens valid for 24 hours.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret),
            token_lifetime: Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS),
        }
    }

    /// Override the session token lifetime.
    pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = lifetime;
        self
    }

    pub fn token_lifetime(&self) -> Duration {
        self.token_lifetime
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash in constant time.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and issue a fresh session token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: impl ToString,
        role: Role,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.verify_password(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token(subject, role)?)
    }

    /// Issue a session token for an identity, valid from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_token(
        &self,
        subject: impl ToString,
        role: Role,
    ) -> Result<AuthenticationResult, JwtError> {
        self.issue_token_at(subject, role, Utc::now())
    }

    /// Issue a session token as if the current time were `issued_at`.
    pub fn issue_token_at(
        &self,
        subject: impl ToString,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<AuthenticationResult, JwtError> {
        let claims = Claims::for_identity(subject, role, issued_at, self.token_lifetime);
        let access_token = self.jwt_handler.encode(&claims)?;

        Ok(AuthenticationResult {
            access_token,
            claims,
        })
    }

    /// Verify a session token against the current time.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be decoded into session claims
    /// * `BadSignature` - Token was not signed with this secret
    /// * `Expired` - Current time is at or past the token's expiry
    pub fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.verify_token_at(token, Utc::now())
    }

    /// Verify a session token as of `now`.
    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let claims: Claims = self.jwt_handler.decode(token)?;

        if claims.is_expired(now.timestamp()) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    /// Change the first signature character to another base64url character,
    /// so the token still decodes but carries different signature bytes.
    fn tamper_signature(token: &str) -> String {
        let (head, signature) = token.rsplit_once('.').expect("token has a signature");
        let mut chars: Vec<char> = signature.chars().collect();
        chars[0] = match chars[0] {
            'A' => 'B',
            'B' => 'A',
            c if c.is_ascii_lowercase() => c.to_ascii_uppercase(),
            _ => 'A',
        };
        format!("{}.{}", head, chars.into_iter().collect::<String>())
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = Authenticator::new(SECRET);

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate("my_password", &hash, "user123", Role::User)
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());

        let decoded = authenticator
            .verify_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(decoded.sub, "user123");
        assert_eq!(decoded.role, Role::User);
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = Authenticator::new(SECRET);

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let result = authenticator.authenticate("wrong_password", &hash, "user123", Role::User);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_issued_token_expires_after_24_hours() {
        let authenticator = Authenticator::new(SECRET);

        let issued = authenticator
            .issue_token("user123", Role::Admin)
            .expect("Failed to issue token");

        assert_eq!(issued.claims.exp - issued.claims.iat, 24 * 60 * 60);
        assert_eq!(issued.claims.role, Role::Admin);
    }

    #[test]
    fn test_token_valid_before_expiry_and_invalid_from_expiry() {
        let authenticator = Authenticator::new(SECRET);
        let issued_at = Utc::now();

        let issued = authenticator
            .issue_token_at("user123", Role::User, issued_at)
            .expect("Failed to issue token");
        let expiry = DateTime::from_timestamp(issued.claims.exp, 0).expect("valid timestamp");

        assert!(authenticator
            .verify_token_at(&issued.access_token, issued_at)
            .is_ok());
        assert!(authenticator
            .verify_token_at(&issued.access_token, expiry - Duration::seconds(1))
            .is_ok());
        assert_eq!(
            authenticator.verify_token_at(&issued.access_token, expiry),
            Err(JwtError::Expired)
        );
        assert_eq!(
            authenticator.verify_token_at(&issued.access_token, expiry + Duration::hours(1)),
            Err(JwtError::Expired)
        );
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let authenticator = Authenticator::new(SECRET);

        let issued = authenticator
            .issue_token("user123", Role::User)
            .expect("Failed to issue token");
        let tampered = tamper_signature(&issued.access_token);

        assert_ne!(tampered, issued.access_token);
        assert_eq!(
            authenticator.verify_token(&tampered),
            Err(JwtError::BadSignature)
        );
    }

    #[test]
    fn test_escalated_role_in_payload_is_rejected() {
        let authenticator = Authenticator::new(SECRET);
        let user_token = authenticator
            .issue_token("user123", Role::User)
            .expect("Failed to issue token")
            .access_token;
        let admin_token = authenticator
            .issue_token("user123", Role::Admin)
            .expect("Failed to issue token")
            .access_token;

        // Splice the admin payload onto the user token's signature.
        let user_parts: Vec<&str> = user_token.split('.').collect();
        let admin_parts: Vec<&str> = admin_token.split('.').collect();
        let forged = format!("{}.{}.{}", user_parts[0], admin_parts[1], user_parts[2]);

        assert_eq!(
            authenticator.verify_token(&forged),
            Err(JwtError::BadSignature)
        );
    }

    #[test]
    fn test_rotated_secret_invalidates_tokens() {
        let old = Authenticator::new(SECRET);
        let rotated = Authenticator::new(b"another_secret_key_at_least_32_bytes");

        let token = old
            .issue_token("user123", Role::User)
            .expect("Failed to issue token")
            .access_token;

        assert_eq!(rotated.verify_token(&token), Err(JwtError::BadSignature));
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = Authenticator::new(SECRET);

        assert!(matches!(
            authenticator.verify_token("invalid.token.here"),
            Err(JwtError::Malformed(_))
        ));
    }

    #[test]
    fn test_custom_token_lifetime() {
        let authenticator = Authenticator::new(SECRET).with_token_lifetime(Duration::minutes(5));

        let issued = authenticator
            .issue_token("user123", Role::User)
            .expect("Failed to issue token");

        assert_eq!(issued.claims.exp - issued.claims.iat, 300);
    }
}
