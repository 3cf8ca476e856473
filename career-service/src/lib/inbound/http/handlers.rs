use auth::Role;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::career_path::errors::CareerPathError;
use crate::career_path::models::CareerPath;
use crate::user::errors::UserError;
use crate::user::models::User;

pub mod change_password;
pub mod create_career_path;
pub mod current_user;
pub mod delete_career_path;
pub mod delete_user;
pub mod list_all_career_paths;
pub mod list_career_paths;
pub mod list_users;
pub mod login;
pub mod profile;
pub mod register;
pub mod stats;
pub mod update_role;

const UNAVAILABLE: &str = "Service temporarily unavailable";
const INTERNAL: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::Forbidden => ApiError::Forbidden("Forbidden".to_string()),
            UserError::InvalidUserId(_)
            | UserError::InvalidName(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPassword(_) => ApiError::UnprocessableEntity(err.to_string()),
            UserError::StoreTimeout(_) | UserError::DatabaseError(_) => {
                tracing::error!(error = %err, "Store unavailable");
                ApiError::ServiceUnavailable(UNAVAILABLE.to_string())
            }
            UserError::PasswordHashing(_) | UserError::TokenIssuance(_) => {
                tracing::error!(error = %err, "Credential processing failed");
                ApiError::InternalServerError(INTERNAL.to_string())
            }
        }
    }
}

impl From<CareerPathError> for ApiError {
    fn from(err: CareerPathError) -> Self {
        match err {
            CareerPathError::NotFound(_) => ApiError::NotFound(err.to_string()),
            CareerPathError::Forbidden => ApiError::Forbidden("Forbidden".to_string()),
            CareerPathError::OwnerNotFound(_) => {
                tracing::warn!(error = %err, "Career path owner vanished after authentication");
                ApiError::Unauthorized("Unauthorized".to_string())
            }
            CareerPathError::InvalidId(_) | CareerPathError::InvalidField(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            CareerPathError::StoreTimeout(_) | CareerPathError::DatabaseError(_) => {
                tracing::error!(error = %err, "Store unavailable");
                ApiError::ServiceUnavailable(UNAVAILABLE.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Bearer token handed out by register and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenResponseData {
    pub token: String,
}

/// Public view of an identity. The password hash is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub interests: Vec<String>,
    pub skills: Vec<String>,
    pub goals: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            role: user.role,
            interests: user.profile.interests.clone(),
            skills: user.profile.skills.clone(),
            goals: user.profile.goals.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CareerPathData {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&CareerPath> for CareerPathData {
    fn from(career_path: &CareerPath) -> Self {
        Self {
            id: career_path.id.to_string(),
            user_id: career_path.owner.to_string(),
            title: career_path.title.as_str().to_string(),
            description: career_path.description.as_str().to_string(),
            required_skills: career_path.required_skills.clone(),
            created_at: career_path.created_at,
        }
    }
}
