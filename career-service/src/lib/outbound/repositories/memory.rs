use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::career_path::errors::CareerPathError;
use crate::career_path::models::CareerPath;
use crate::career_path::models::CareerPathId;
use crate::career_path::ports::CareerPathRepository;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserUpdate;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    career_paths: HashMap<CareerPathId, CareerPath>,
}

/// Process-local store backing both repository ports.
///
/// All mutations take the single write lock, so the email check and insert,
/// field updates and the user cascade each happen as one step.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T, F>(mut items: Vec<T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    items
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut state = self.state.write().await;

        if state.users.values().any(|existing| existing.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|user| user.email == *email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let users = self.state.read().await.users.values().cloned().collect();
        Ok(newest_first(users, |user: &User| user.created_at))
    }

    async fn update(&self, id: &UserId, update: UserUpdate) -> Result<User, UserError> {
        let mut state = self.state.write().await;

        let user = state
            .users
            .get_mut(id)
            .ok_or(UserError::NotFound(id.to_string()))?;
        update.apply(user);

        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut state = self.state.write().await;

        if state.users.remove(id).is_none() {
            return Err(UserError::NotFound(id.to_string()));
        }
        state.career_paths.retain(|_, path| path.owner != *id);

        Ok(())
    }
}

#[async_trait]
impl CareerPathRepository for InMemoryStore {
    async fn create(&self, career_path: CareerPath) -> Result<CareerPath, CareerPathError> {
        let mut state = self.state.write().await;

        // Mirrors the foreign key of the relational schema.
        if !state.users.contains_key(&career_path.owner) {
            return Err(CareerPathError::OwnerNotFound(career_path.owner.to_string()));
        }

        state.career_paths.insert(career_path.id, career_path.clone());
        Ok(career_path)
    }

    async fn find_by_id(&self, id: &CareerPathId) -> Result<Option<CareerPath>, CareerPathError> {
        Ok(self.state.read().await.career_paths.get(id).cloned())
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<CareerPath>, CareerPathError> {
        let paths = self
            .state
            .read()
            .await
            .career_paths
            .values()
            .filter(|path| path.owner == *owner)
            .cloned()
            .collect();

        Ok(newest_first(paths, |path: &CareerPath| path.created_at))
    }

    async fn list_all(&self) -> Result<Vec<CareerPath>, CareerPathError> {
        let paths = self.state.read().await.career_paths.values().cloned().collect();
        Ok(newest_first(paths, |path: &CareerPath| path.created_at))
    }

    async fn delete(&self, id: &CareerPathId) -> Result<(), CareerPathError> {
        self.state
            .write()
            .await
            .career_paths
            .remove(id)
            .map(|_| ())
            .ok_or(CareerPathError::NotFound(id.to_string()))
    }

    async fn delete_owned_by(&self, owner: &UserId) -> Result<u64, CareerPathError> {
        let mut state = self.state.write().await;

        let before = state.career_paths.len();
        state.career_paths.retain(|_, path| path.owner != *owner);

        Ok((before - state.career_paths.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use auth::Role;
    use chrono::Utc;

    use super::*;
    use crate::career_path::models::Description;
    use crate::career_path::models::Title;
    use crate::domain::user::models::DisplayName;
    use crate::domain::user::models::Profile;
    use crate::domain::user::models::UpdateProfileCommand;

    fn user(email: &str) -> User {
        User {
            id: UserId::new(),
            name: DisplayName::new("Test".to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$placeholder".to_string(),
            role: Role::User,
            profile: Profile::default(),
            created_at: Utc::now(),
        }
    }

    fn career_path(owner: UserId, title: &str) -> CareerPath {
        CareerPath {
            id: CareerPathId::new(),
            owner,
            title: Title::new(title.to_string()).unwrap(),
            description: Description::new("Description".to_string()).unwrap(),
            required_skills: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_in_any_case_is_rejected() {
        let store = InMemoryStore::new();
        let original = UserRepository::create(&store, user("alice@example.com"))
            .await
            .unwrap();

        let result = UserRepository::create(&store, user("ALICE@Example.com")).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));

        let users = UserRepository::list_all(&store).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].id, original.id);
    }

    #[tokio::test]
    async fn test_concurrent_registration_admits_exactly_one() {
        let store = Arc::new(InMemoryStore::new());

        let attempts: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                let email = if i % 2 == 0 {
                    "race@example.com"
                } else {
                    "RACE@example.com"
                };
                let candidate = user(email);
                tokio::spawn(async move {
                    UserRepository::create(store.as_ref(), candidate).await
                })
            })
            .collect();

        let mut created = 0;
        for attempt in attempts {
            if attempt.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(UserRepository::list_all(store.as_ref()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_is_field_scoped() {
        let store = InMemoryStore::new();
        let created = UserRepository::create(&store, user("bob@example.com"))
            .await
            .unwrap();

        store
            .update(&created.id, UserUpdate::role(Role::Admin))
            .await
            .unwrap();
        let updated = store
            .update(&created.id, UserUpdate::password_hash("$argon2id$new".to_string()))
            .await
            .unwrap();

        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.password_hash, "$argon2id$new");

        let missing = store.update(&UserId::new(), UserUpdate::role(Role::User)).await;
        assert!(matches!(missing, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_profile_update_leaves_other_identities() {
        let store = InMemoryStore::new();
        let alice = UserRepository::create(&store, user("alice@example.com"))
            .await
            .unwrap();
        let bob = UserRepository::create(&store, user("bob@example.com"))
            .await
            .unwrap();

        let command = UpdateProfileCommand {
            name: DisplayName::new("Alice".to_string()).unwrap(),
            profile: Profile::new(vec!["design".to_string()], Vec::new(), Vec::new()),
        };
        let updated = store
            .update(&alice.id, UserUpdate::profile(command))
            .await
            .unwrap();

        assert_eq!(updated.profile.interests, vec!["design"]);
        assert_eq!(updated.password_hash, alice.password_hash);
        let untouched = UserRepository::find_by_id(&store, &bob.id).await.unwrap();
        assert_eq!(untouched, Some(bob));
    }

    #[tokio::test]
    async fn test_delete_cascades_only_to_owned_records() {
        let store = InMemoryStore::new();
        let x = UserRepository::create(&store, user("x@example.com")).await.unwrap();
        let y = UserRepository::create(&store, user("y@example.com")).await.unwrap();

        CareerPathRepository::create(&store, career_path(x.id, "X one")).await.unwrap();
        CareerPathRepository::create(&store, career_path(x.id, "X two")).await.unwrap();
        let kept = CareerPathRepository::create(&store, career_path(y.id, "Y one"))
            .await
            .unwrap();

        UserRepository::delete(&store, &x.id).await.unwrap();

        assert!(UserRepository::find_by_id(&store, &x.id).await.unwrap().is_none());
        assert!(store.find_by_owner(&x.id).await.unwrap().is_empty());

        let remaining = CareerPathRepository::list_all(&store).await.unwrap();
        assert_eq!(remaining, vec![kept]);

        let again = UserRepository::delete(&store, &x.id).await;
        assert!(matches!(again, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_owned_by_is_idempotent() {
        let store = InMemoryStore::new();
        let owner = UserRepository::create(&store, user("owner@example.com"))
            .await
            .unwrap();
        CareerPathRepository::create(&store, career_path(owner.id, "Path"))
            .await
            .unwrap();

        assert_eq!(store.delete_owned_by(&owner.id).await.unwrap(), 1);
        assert_eq!(store.delete_owned_by(&owner.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_career_path_requires_existing_owner() {
        let store = InMemoryStore::new();
        let orphan = career_path(UserId::new(), "Orphan");
        let result = CareerPathRepository::create(&store, orphan).await;
        assert!(matches!(result, Err(CareerPathError::OwnerNotFound(_))));
        assert!(CareerPathRepository::list_all(&store).await.unwrap().is_empty());
    }
}
