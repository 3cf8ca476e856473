use std::fmt;
use std::str::FromStr;

use auth::Role;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserIdError;

/// Identity aggregate entity.
///
/// The authoritative account record. `password_hash` never leaves the
/// service boundary; response types copy every other field explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id,
            role: self.role,
        }
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The identity a request acts as, resolved by the authentication gate.
///
/// Carries the role as currently stored, not as recorded in the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether this principal may act on a record owned by `owner`.
    pub fn owns(&self, owner: &UserId) -> bool {
        self.id == *owner
    }
}

/// Display name value type
///
/// Trimmed, non-empty, at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MAX_LENGTH: usize = 100;

    pub fn new(name: String) -> Result<Self, NameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();

        if length == 0 {
            Err(NameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser and normalizes to
/// lowercase, so equality between two `EmailAddress` values is the
/// case-insensitive match used for uniqueness and login.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();

        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted for hashing.
///
/// Only exists between request parsing and the hasher. Debug output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;

    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Career-guidance details an identity keeps about itself.
///
/// Entries are trimmed and blank ones dropped on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub interests: Vec<String>,
    pub skills: Vec<String>,
    pub goals: Vec<String>,
}

impl Profile {
    pub fn new(interests: Vec<String>, skills: Vec<String>, goals: Vec<String>) -> Self {
        Self {
            interests: clean_entries(interests),
            skills: clean_entries(skills),
            goals: clean_entries(goals),
        }
    }
}

fn clean_entries(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Command to register a new identity with validated fields
#[derive(Debug)]
pub struct RegisterCommand {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password: Password,
}

impl RegisterCommand {
    pub fn new(name: DisplayName, email: EmailAddress, password: Password) -> Self {
        Self {
            name,
            email,
            password,
        }
    }
}

/// Command to replace the caller's password.
///
/// The current password is left unvalidated: it only has to match the stored hash.
#[derive(Debug)]
pub struct ChangePasswordCommand {
    pub current_password: String,
    pub new_password: Password,
}

/// Command to replace the caller's display name and profile details
#[derive(Debug)]
pub struct UpdateProfileCommand {
    pub name: DisplayName,
    pub profile: Profile,
}

/// Field-scoped update applied atomically by the store.
///
/// Fields left as `None` keep their stored value, so concurrent updates to
/// different fields never overwrite each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: Option<DisplayName>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub profile: Option<Profile>,
}

impl UserUpdate {
    pub fn password_hash(password_hash: String) -> Self {
        Self {
            password_hash: Some(password_hash),
            ..Self::default()
        }
    }

    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Self::default()
        }
    }

    pub fn profile(command: UpdateProfileCommand) -> Self {
        Self {
            name: Some(command.name),
            profile: Some(command.profile),
            ..Self::default()
        }
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(profile) = &self.profile {
            user.profile = profile.clone();
        }
        if let Some(password_hash) = &self.password_hash {
            user.password_hash = password_hash.clone();
        }
        if let Some(role) = self.role {
            user.role = role;
        }
    }
}

/// Outcome of a successful registration or login.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
