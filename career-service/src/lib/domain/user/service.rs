use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::AuthenticationResult;
use auth::Authenticator;
use auth::Role;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::deadline::bounded;
use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Principal;
use crate::domain::user::models::Profile;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::Session;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserUpdate;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for account operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    store_timeout: Duration,
    /// Verified against when the login email is unknown, so both failure
    /// paths pay for one Argon2 verification.
    dummy_hash: String,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `authenticator` - Password hashing and token issuance
    /// * `store_timeout` - Upper bound for every store round-trip
    pub fn new(
        repository: Arc<UR>,
        authenticator: Arc<Authenticator>,
        store_timeout: Duration,
    ) -> Self {
        let dummy_hash = authenticator
            .hash_password("career-service-unknown-identity")
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to prepare login dummy hash");
                String::new()
            });

        Self {
            repository,
            authenticator,
            store_timeout,
            dummy_hash,
        }
    }

    /// Create the configured administrator if no identity uses its email yet.
    ///
    /// # Returns
    /// `true` if an identity was created
    pub async fn bootstrap_admin(&self, command: RegisterCommand) -> Result<bool, UserError> {
        let existing = bounded(
            self.store_timeout,
            self.repository.find_by_email(&command.email),
        )
        .await?;
        if existing.is_some() {
            return Ok(false);
        }

        let user = self.new_identity(command, Role::Admin)?;
        match bounded(self.store_timeout, self.repository.create(user)).await {
            Ok(created) => {
                tracing::info!(user_id = %created.id, "Bootstrap administrator created");
                Ok(true)
            }
            Err(UserError::EmailAlreadyExists(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn new_identity(&self, command: RegisterCommand, role: Role) -> Result<User, UserError> {
        let password_hash = self.authenticator.hash_password(command.password.expose())?;

        Ok(User {
            id: UserId::new(),
            name: command.name,
            email: command.email,
            password_hash,
            role,
            profile: Profile::default(),
            created_at: Utc::now(),
        })
    }

    fn session(user: User, issued: AuthenticationResult) -> Session {
        let expires_at = DateTime::<Utc>::from_timestamp(issued.claims.exp, 0).unwrap_or_default();

        Session {
            user,
            token: issued.access_token,
            expires_at,
        }
    }

    fn require_admin(actor: &Principal) -> Result<(), UserError> {
        if actor.is_admin() {
            Ok(())
        } else {
            tracing::warn!(user_id = %actor.id, "Admin operation refused for non-admin identity");
            Err(UserError::Forbidden)
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<Session, UserError> {
        let user = self.new_identity(command, Role::User)?;
        let created = bounded(self.store_timeout, self.repository.create(user)).await?;

        let issued = self.authenticator.issue_token(created.id, created.role)?;
        tracing::info!(user_id = %created.id, "Identity registered");

        Ok(Self::session(created, issued))
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, UserError> {
        let user = match EmailAddress::new(email.to_string()) {
            Ok(email) => bounded(self.store_timeout, self.repository.find_by_email(&email)).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            self.authenticator.verify_password(password, &self.dummy_hash);
            tracing::warn!(reason = "unknown_email", "Login rejected");
            return Err(UserError::InvalidCredentials);
        };

        match self
            .authenticator
            .authenticate(password, &user.password_hash, user.id, user.role)
        {
            Ok(issued) => {
                tracing::debug!(user_id = %user.id, "Login succeeded");
                Ok(Self::session(user, issued))
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::warn!(user_id = %user.id, reason = "password_mismatch", "Login rejected");
                Err(UserError::InvalidCredentials)
            }
            Err(AuthenticationError::JwtError(e)) => Err(e.into()),
        }
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        bounded(self.store_timeout, self.repository.find_by_id(id))
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn list_users(&self, actor: &Principal) -> Result<Vec<User>, UserError> {
        Self::require_admin(actor)?;
        bounded(self.store_timeout, self.repository.list_all()).await
    }

    async fn change_password(
        &self,
        principal: &Principal,
        command: ChangePasswordCommand,
    ) -> Result<(), UserError> {
        let user = self.get_user(&principal.id).await?;

        if !self
            .authenticator
            .verify_password(&command.current_password, &user.password_hash)
        {
            tracing::warn!(
                user_id = %user.id,
                "Password change rejected: current password mismatch"
            );
            return Err(UserError::InvalidCredentials);
        }

        let password_hash = self
            .authenticator
            .hash_password(command.new_password.expose())?;
        bounded(
            self.store_timeout,
            self.repository
                .update(&user.id, UserUpdate::password_hash(password_hash)),
        )
        .await?;

        tracing::info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    async fn update_profile(
        &self,
        principal: &Principal,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError> {
        let updated = bounded(
            self.store_timeout,
            self.repository
                .update(&principal.id, UserUpdate::profile(command)),
        )
        .await?;

        tracing::info!(user_id = %principal.id, "Profile updated");
        Ok(updated)
    }

    async fn update_role(
        &self,
        actor: &Principal,
        target: &UserId,
        role: Role,
    ) -> Result<User, UserError> {
        Self::require_admin(actor)?;

        let updated = bounded(
            self.store_timeout,
            self.repository.update(target, UserUpdate::role(role)),
        )
        .await?;

        tracing::info!(actor = %actor.id, target = %target, role = %role, "Role updated");
        Ok(updated)
    }

    async fn delete_user(&self, actor: &Principal, target: &UserId) -> Result<(), UserError> {
        Self::require_admin(actor)?;

        bounded(self.store_timeout, self.repository.delete(target)).await?;

        tracing::info!(actor = %actor.id, target = %target, "Identity deleted with owned records");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::user::models::DisplayName;
    use crate::domain::user::models::Password;

    const SECRET: &[u8] = b"test-secret-that-is-at-least-32-bytes-long";
    const TIMEOUT: Duration = Duration::from_secs(5);

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
            async fn update(&self, id: &UserId, update: UserUpdate) -> Result<User, UserError>;
            async fn delete(&self, id: &UserId) -> Result<(), UserError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(SECRET))
    }

    fn service(repository: MockTestUserRepository) -> UserService<MockTestUserRepository> {
        UserService::new(Arc::new(repository), authenticator(), TIMEOUT)
    }

    fn stored_user(password: &str, role: Role) -> User {
        User {
            id: UserId::new(),
            name: DisplayName::new("Alice".to_string()).unwrap(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            password_hash: authenticator().hash_password(password).unwrap(),
            role,
            profile: Profile::default(),
            created_at: Utc::now(),
        }
    }

    fn register_command() -> RegisterCommand {
        RegisterCommand::new(
            DisplayName::new("Alice".to_string()).unwrap(),
            EmailAddress::new("Alice@Example.com".to_string()).unwrap(),
            Password::new("secret1".to_string()).unwrap(),
        )
    }

    fn principal(role: Role) -> Principal {
        Principal {
            id: UserId::new(),
            role,
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .withf(|user| {
                user.email.as_str() == "alice@example.com"
                    && user.role == Role::User
                    && user.password_hash.starts_with("$argon2id$")
            })
            .times(1)
            .returning(|user| Ok(user));

        let session = service(repository).register(register_command()).await.unwrap();

        let claims = authenticator().verify_token(&session.token).unwrap();
        assert_eq!(claims.sub, session.user.id.to_string());
        assert_eq!(claims.role, Role::User);
        assert_eq!(session.expires_at.timestamp(), claims.exp);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .times(1)
            .returning(|user| Err(UserError::EmailAlreadyExists(user.email.to_string())));

        let result = service(repository).register(register_command()).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("secret1", Role::Admin);
        let user_id = user.id;

        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "alice@example.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let session = service(repository)
            .login("ALICE@example.com", "secret1")
            .await
            .unwrap();

        let claims = authenticator().verify_token(&session.token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("secret1", Role::User);

        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "alice@example.com")
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "nobody@example.com")
            .returning(|_| Ok(None));

        let service = service(repository);

        let wrong_password = service.login("alice@example.com", "wrong-password").await;
        let unknown_email = service.login("nobody@example.com", "secret1").await;
        let malformed_email = service.login("not-an-email", "secret1").await;

        for result in [wrong_password, unknown_email, malformed_email] {
            let error = result.unwrap_err();
            assert!(matches!(error, UserError::InvalidCredentials));
            assert_eq!(error.to_string(), "Invalid credentials");
        }
    }

    #[tokio::test]
    async fn test_change_password_wrong_current_leaves_hash() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("secret1", Role::User);
        let principal = user.principal();

        repository
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        repository.expect_update().times(0);

        let command = ChangePasswordCommand {
            current_password: "wrong".to_string(),
            new_password: Password::new("secret2".to_string()).unwrap(),
        };

        let result = service(repository).change_password(&principal, command).await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_change_password_success() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("secret1", Role::User);
        let principal = user.principal();
        let returned = user.clone();

        repository
            .expect_find_by_id()
            .with(eq(principal.id))
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        repository
            .expect_update()
            .withf(move |id, update| {
                *id == principal.id
                    && update.role.is_none()
                    && update
                        .password_hash
                        .as_deref()
                        .is_some_and(|hash| authenticator().verify_password("secret2", hash))
            })
            .times(1)
            .returning(move |_, _| Ok(returned.clone()));

        let command = ChangePasswordCommand {
            current_password: "secret1".to_string(),
            new_password: Password::new("secret2".to_string()).unwrap(),
        };

        assert!(service(repository)
            .change_password(&principal, command)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_update_profile_targets_caller_only() {
        let mut repository = MockTestUserRepository::new();
        let user = stored_user("secret1", Role::User);
        let principal = user.principal();

        repository
            .expect_update()
            .withf(move |id, update| {
                *id == principal.id
                    && update.password_hash.is_none()
                    && update.role.is_none()
                    && update.name.as_ref().is_some_and(|name| name.as_str() == "Alice B")
            })
            .times(1)
            .returning(move |_, update| {
                let mut updated = user.clone();
                update.apply(&mut updated);
                Ok(updated)
            });

        let command = UpdateProfileCommand {
            name: DisplayName::new("Alice B".to_string()).unwrap(),
            profile: Profile::new(
                vec!["robotics".to_string()],
                vec!["Rust".to_string()],
                vec!["Find an internship".to_string()],
            ),
        };

        let updated = service(repository)
            .update_profile(&principal, command)
            .await
            .unwrap();
        assert_eq!(updated.id, principal.id);
        assert_eq!(updated.profile.skills, vec!["Rust"]);
        assert_eq!(updated.role, Role::User);
    }

    #[tokio::test]
    async fn test_admin_operations_forbidden_for_user_role() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_list_all().times(0);
        repository.expect_update().times(0);
        repository.expect_delete().times(0);

        let service = service(repository);
        let actor = principal(Role::User);
        let target = UserId::new();

        assert!(matches!(
            service.list_users(&actor).await,
            Err(UserError::Forbidden)
        ));
        assert!(matches!(
            service.update_role(&actor, &target, Role::Admin).await,
            Err(UserError::Forbidden)
        ));
        assert!(matches!(
            service.delete_user(&actor, &target).await,
            Err(UserError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_update_role_missing_target() {
        let mut repository = MockTestUserRepository::new();
        let target = UserId::new();

        repository
            .expect_update()
            .with(eq(target), eq(UserUpdate::role(Role::Admin)))
            .times(1)
            .returning(|id, _| Err(UserError::NotFound(id.to_string())));

        let result = service(repository)
            .update_role(&principal(Role::Admin), &target, Role::Admin)
            .await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_admin_may_demote_self() {
        let mut repository = MockTestUserRepository::new();
        let admin = stored_user("secret1", Role::Admin);
        let actor = admin.principal();

        repository
            .expect_update()
            .with(eq(actor.id), eq(UserUpdate::role(Role::User)))
            .times(1)
            .returning(move |_, update| {
                let mut user = admin.clone();
                update.apply(&mut user);
                Ok(user)
            });

        let updated = service(repository)
            .update_role(&actor, &actor.id, Role::User)
            .await
            .unwrap();
        assert_eq!(updated.role, Role::User);
    }

    #[tokio::test]
    async fn test_delete_user_by_admin() {
        let mut repository = MockTestUserRepository::new();
        let target = UserId::new();

        repository
            .expect_delete()
            .with(eq(target))
            .times(1)
            .returning(|_| Ok(()));

        assert!(service(repository)
            .delete_user(&principal(Role::Admin), &target)
            .await
            .is_ok());
    }

    struct SlowRepository;

    #[async_trait]
    impl UserRepository for SlowRepository {
        async fn create(&self, user: User) -> Result<User, UserError> {
            Ok(user)
        }

        async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }

        async fn find_by_email(&self, _email: &EmailAddress) -> Result<Option<User>, UserError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }

        async fn list_all(&self) -> Result<Vec<User>, UserError> {
            Ok(Vec::new())
        }

        async fn update(&self, id: &UserId, _update: UserUpdate) -> Result<User, UserError> {
            Err(UserError::NotFound(id.to_string()))
        }

        async fn delete(&self, _id: &UserId) -> Result<(), UserError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_slow_store_surfaces_as_timeout() {
        let service = UserService::new(
            Arc::new(SlowRepository),
            authenticator(),
            Duration::from_millis(20),
        );

        let error = service
            .login("alice@example.com", "secret1")
            .await
            .unwrap_err();
        assert!(matches!(error, UserError::StoreTimeout(_)));
        assert!(error.is_retriable());

        let error = service.get_user(&UserId::new()).await.unwrap_err();
        assert!(matches!(error, UserError::StoreTimeout(_)));
    }

    #[tokio::test]
    async fn test_bootstrap_admin_skips_existing_email() {
        let mut repository = MockTestUserRepository::new();
        let existing = stored_user("secret1", Role::User);

        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_create().times(0);

        let created = service(repository)
            .bootstrap_admin(register_command())
            .await
            .unwrap();
        assert!(!created);
    }
}
