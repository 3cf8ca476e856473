use std::str::FromStr;

use async_trait::async_trait;
use auth::Role;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Profile;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserUpdate;
use crate::domain::user::ports::UserRepository;
use crate::outbound::repositories::career_path::delete_owned_by;
use crate::user::errors::UserError;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    interests: Vec<String>,
    skills: Vec<String>,
    goals: Vec<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::from_str(&row.role)
            .map_err(|e| UserError::DatabaseError(format!("Stored row {}: {}", row.id, e)))?;

        Ok(User {
            id: UserId(row.id),
            name: DisplayName::new(row.name)?,
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            role,
            profile: Profile {
                interests: row.interests,
                skills: row.skills,
                goals: row.goals,
            },
            created_at: row.created_at,
        })
    }
}

fn database_error(e: sqlx::Error) -> UserError {
    UserError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users
                (id, name, email, password_hash, role, interests, skills, goals, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id.0)
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.profile.interests)
        .bind(&user.profile.skills)
        .bind(&user.profile.goals)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return UserError::EmailAlreadyExists(user.email.to_string());
                }
            }
            database_error(e)
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, role, interests, skills, goals, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(User::try_from)
        .transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, role, interests, skills, goals, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(User::try_from)
        .transpose()
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password_hash, role, interests, skills, goals, created_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?
        .into_iter()
        .map(User::try_from)
        .collect()
    }

    async fn update(&self, id: &UserId, update: UserUpdate) -> Result<User, UserError> {
        // Unset fields keep their stored value within the same statement.
        sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET password_hash = COALESCE($2, password_hash),
                role = COALESCE($3, role),
                name = COALESCE($4, name),
                interests = COALESCE($5, interests),
                skills = COALESCE($6, skills),
                goals = COALESCE($7, goals)
            WHERE id = $1
            RETURNING id, name, email, password_hash, role, interests, skills, goals, created_at
            "#,
        )
        .bind(id.0)
        .bind(update.password_hash)
        .bind(update.role.map(|role| role.as_str()))
        .bind(update.name.map(|name| name.as_str().to_string()))
        .bind(update.profile.as_ref().map(|profile| profile.interests.clone()))
        .bind(update.profile.as_ref().map(|profile| profile.skills.clone()))
        .bind(update.profile.map(|profile| profile.goals))
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(User::try_from)
        .transpose()?
        .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        let mut tx = self.pool.begin().await.map_err(database_error)?;

        let removed_paths = delete_owned_by(&mut *tx, id).await.map_err(database_error)?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.0)
            .execute(&mut *tx)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(database_error)?;
            return Err(UserError::NotFound(id.to_string()));
        }

        tx.commit().await.map_err(database_error)?;
        tracing::debug!(user_id = %id, removed_paths, "User row deleted");

        Ok(())
    }
}
