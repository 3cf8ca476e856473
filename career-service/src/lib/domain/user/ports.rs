use async_trait::async_trait;
use auth::Role;

use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Principal;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserUpdate;
use crate::user::errors::UserError;

/// Port for account operations.
///
/// Every method that acts on behalf of a caller takes the `Principal`
/// resolved by the authentication gate.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new identity with role `user` and open a session for it.
    ///
    /// # Arguments
    /// * `command` - Validated name, email and password
    ///
    /// # Returns
    /// Session holding the created user and a fresh token
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is registered in any case variant
    /// * `PasswordHashing` - Hasher failed (not retriable)
    /// * `StoreTimeout` / `DatabaseError` - Store unavailable
    async fn register(&self, command: RegisterCommand) -> Result<Session, UserError>;

    /// Verify credentials and open a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, indistinguishably
    /// * `StoreTimeout` / `DatabaseError` - Store unavailable
    async fn login(&self, email: &str, password: &str) -> Result<Session, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// List every identity. Admin only.
    ///
    /// # Errors
    /// * `Forbidden` - Caller is not an admin
    async fn list_users(&self, actor: &Principal) -> Result<Vec<User>, UserError>;

    /// Replace the caller's password after re-verifying the current one.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Current password does not match; stored hash unchanged
    /// * `NotFound` - Caller's identity was deleted meanwhile
    async fn change_password(
        &self,
        principal: &Principal,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError>;

    /// Replace the caller's display name and profile details.
    ///
    /// Acts on `principal.id` only; password hash and role are left untouched.
    ///
    /// # Errors
    /// * `NotFound` - Caller's identity was deleted meanwhile
    async fn update_profile(
        &self,
        principal: &Principal,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError>;

    /// Set the role of `target`. Admin only; an admin may demote themself.
    ///
    /// # Errors
    /// * `Forbidden` - Caller is not an admin
    /// * `NotFound` - Target does not exist
    async fn update_role(
        &self,
        actor: &Principal,
        target: &UserId,
        role: Role,
    ) -> Result<User, UserError>;

    /// Delete `target` and every record it owns, atomically. Admin only.
    ///
    /// # Errors
    /// * `Forbidden` - Caller is not an admin
    /// * `NotFound` - Target does not exist
    async fn delete_user(&self, actor: &Principal, target: &UserId) -> Result<(), UserError>;
}

/// Persistence operations for identity records.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Insert a new identity.
    ///
    /// Email uniqueness is checked atomically with the insert, case-insensitively.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered; nothing is overwritten
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve identity by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve identity by normalized email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Retrieve all identities, newest first.
    async fn list_all(&self) -> Result<Vec<User>, UserError>;

    /// Apply a field-scoped update atomically.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn update(&self, id: &UserId, update: UserUpdate) -> Result<User, UserError>;

    /// Remove an identity together with every record it owns, in one transaction.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist; nothing is removed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
