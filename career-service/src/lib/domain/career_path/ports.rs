use async_trait::async_trait;

use crate::career_path::errors::CareerPathError;
use crate::career_path::models::CareerPath;
use crate::career_path::models::CareerPathId;
use crate::career_path::models::CreateCareerPathCommand;
use crate::user::models::Principal;
use crate::user::models::UserId;

/// Port for career path operations.
///
/// Non-admin callers only ever see or touch records they own.
#[async_trait]
pub trait CareerPathServicePort: Send + Sync + 'static {
    /// Create a career path owned by the caller.
    async fn create(
        &self,
        principal: &Principal,
        command: CreateCareerPathCommand,
    ) -> Result<CareerPath, CareerPathError>;

    /// List the caller's own career paths, newest first.
    async fn list_own(&self, principal: &Principal) -> Result<Vec<CareerPath>, CareerPathError>;

    /// List every career path. Admin only.
    ///
    /// # Errors
    /// * `Forbidden` - Caller is not an admin
    async fn list_all(&self, actor: &Principal) -> Result<Vec<CareerPath>, CareerPathError>;

    /// Delete a career path.
    ///
    /// # Errors
    /// * `Forbidden` - Caller is not an admin and does not own a career path with this ID
    /// * `NotFound` - Admin caller and no career path with this ID
    async fn delete(&self, principal: &Principal, id: &CareerPathId)
        -> Result<(), CareerPathError>;
}

/// Persistence operations for career paths.
#[async_trait]
pub trait CareerPathRepository: Send + Sync + 'static {
    async fn create(&self, career_path: CareerPath) -> Result<CareerPath, CareerPathError>;

    async fn find_by_id(&self, id: &CareerPathId) -> Result<Option<CareerPath>, CareerPathError>;

    /// Career paths owned by `owner`, newest first.
    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<CareerPath>, CareerPathError>;

    /// Every career path, newest first.
    async fn list_all(&self) -> Result<Vec<CareerPath>, CareerPathError>;

    /// # Errors
    /// * `NotFound` - No career path with this ID
    async fn delete(&self, id: &CareerPathId) -> Result<(), CareerPathError>;

    /// Remove every career path owned by `owner`.
    ///
    /// Idempotent: an owner without records yields `Ok(0)`.
    ///
    /// # Returns
    /// Number of removed records
    async fn delete_owned_by(&self, owner: &UserId) -> Result<u64, CareerPathError>;
}
