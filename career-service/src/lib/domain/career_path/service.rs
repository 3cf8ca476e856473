use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::career_path::errors::CareerPathError;
use crate::career_path::models::CareerPath;
use crate::career_path::models::CareerPathId;
use crate::career_path::models::CreateCareerPathCommand;
use crate::career_path::ports::CareerPathRepository;
use crate::career_path::ports::CareerPathServicePort;
use crate::domain::deadline::bounded;
use crate::user::models::Principal;

pub struct CareerPathService<CR>
where
    CR: CareerPathRepository,
{
    repository: Arc<CR>,
    store_timeout: Duration,
}

impl<CR> CareerPathService<CR>
where
    CR: CareerPathRepository,
{
    pub fn new(repository: Arc<CR>, store_timeout: Duration) -> Self {
        Self {
            repository,
            store_timeout,
        }
    }
}

#[async_trait]
impl<CR> CareerPathServicePort for CareerPathService<CR>
where
    CR: CareerPathRepository,
{
    async fn create(
        &self,
        principal: &Principal,
        command: CreateCareerPathCommand,
    ) -> Result<CareerPath, CareerPathError> {
        let career_path = CareerPath {
            id: CareerPathId::new(),
            owner: principal.id,
            title: command.title,
            description: command.description,
            required_skills: command.required_skills,
            created_at: Utc::now(),
        };

        let created = bounded(self.store_timeout, self.repository.create(career_path)).await?;
        tracing::debug!(
            career_path_id = %created.id,
            owner = %created.owner,
            "Career path created"
        );

        Ok(created)
    }

    async fn list_own(&self, principal: &Principal) -> Result<Vec<CareerPath>, CareerPathError> {
        bounded(self.store_timeout, self.repository.find_by_owner(&principal.id)).await
    }

    async fn list_all(&self, actor: &Principal) -> Result<Vec<CareerPath>, CareerPathError> {
        if !actor.is_admin() {
            tracing::warn!(
                user_id = %actor.id,
                "Career path listing refused for non-admin identity"
            );
            return Err(CareerPathError::Forbidden);
        }

        bounded(self.store_timeout, self.repository.list_all()).await
    }

    async fn delete(
        &self,
        principal: &Principal,
        id: &CareerPathId,
    ) -> Result<(), CareerPathError> {
        let career_path = bounded(self.store_timeout, self.repository.find_by_id(id)).await?;

        // Non-admins get the same answer for absent and foreign records.
        let owned = career_path
            .as_ref()
            .is_some_and(|path| principal.owns(&path.owner));
        if !owned && !principal.is_admin() {
            tracing::warn!(
                user_id = %principal.id,
                career_path_id = %id,
                exists = career_path.is_some(),
                "Career path deletion refused: not the owner"
            );
            return Err(CareerPathError::Forbidden);
        }

        if career_path.is_none() {
            return Err(CareerPathError::NotFound(id.to_string()));
        }

        match bounded(self.store_timeout, self.repository.delete(id)).await {
            Err(CareerPathError::NotFound(_)) if !principal.is_admin() => {
                Err(CareerPathError::Forbidden)
            }
            result => result,
        }
    }
}
