use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgExecutor;
use sqlx::PgPool;
use uuid::Uuid;

use crate::career_path::errors::CareerPathError;
use crate::career_path::models::CareerPath;
use crate::career_path::models::CareerPathId;
use crate::career_path::models::Description;
use crate::career_path::models::Title;
use crate::career_path::ports::CareerPathRepository;
use crate::user::models::UserId;

pub struct PostgresCareerPathRepository {
    pool: PgPool,
}

impl PostgresCareerPathRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CareerPathRow {
    id: Uuid,
    user_id: Uuid,
    title: String,
    description: String,
    required_skills: Vec<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CareerPathRow> for CareerPath {
    type Error = CareerPathError;

    fn try_from(row: CareerPathRow) -> Result<Self, Self::Error> {
        Ok(CareerPath {
            id: CareerPathId(row.id),
            owner: UserId(row.user_id),
            title: Title::new(row.title)?,
            description: Description::new(row.description)?,
            required_skills: row.required_skills,
            created_at: row.created_at,
        })
    }
}

fn database_error(e: sqlx::Error) -> CareerPathError {
    CareerPathError::DatabaseError(e.to_string())
}

/// Remove every career path owned by `owner` through any executor.
///
/// Shared by the repository and by the user deletion transaction.
pub(crate) async fn delete_owned_by<'e, E>(executor: E, owner: &UserId) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM career_paths WHERE user_id = $1")
        .bind(owner.0)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

#[async_trait]
impl CareerPathRepository for PostgresCareerPathRepository {
    async fn create(&self, career_path: CareerPath) -> Result<CareerPath, CareerPathError> {
        sqlx::query(
            r#"
            INSERT INTO career_paths (id, user_id, title, description, required_skills, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(career_path.id.0)
        .bind(career_path.owner.0)
        .bind(career_path.title.as_str())
        .bind(career_path.description.as_str())
        .bind(&career_path.required_skills)
        .bind(career_path.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return CareerPathError::OwnerNotFound(career_path.owner.to_string());
                }
            }
            database_error(e)
        })?;

        Ok(career_path)
    }

    async fn find_by_id(&self, id: &CareerPathId) -> Result<Option<CareerPath>, CareerPathError> {
        sqlx::query_as::<_, CareerPathRow>(
            r#"
            SELECT id, user_id, title, description, required_skills, created_at
            FROM career_paths
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(CareerPath::try_from)
        .transpose()
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<CareerPath>, CareerPathError> {
        sqlx::query_as::<_, CareerPathRow>(
            r#"
            SELECT id, user_id, title, description, required_skills, created_at
            FROM career_paths
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(CareerPath::try_from)
        .collect()
    }

    async fn list_all(&self) -> Result<Vec<CareerPath>, CareerPathError> {
        sqlx::query_as::<_, CareerPathRow>(
            r#"
            SELECT id, user_id, title, description, required_skills, created_at
            FROM career_paths
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(CareerPath::try_from)
        .collect()
    }

    async fn delete(&self, id: &CareerPathId) -> Result<(), CareerPathError> {
        let result = sqlx::query("DELETE FROM career_paths WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(CareerPathError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn delete_owned_by(&self, owner: &UserId) -> Result<u64, CareerPathError> {
        delete_owned_by(&self.pool, owner).await.map_err(database_error)
    }
}
