use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::CareerPathData;
use super::UserData;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::Principal;
use crate::domain::user::models::Profile;
use crate::domain::user::models::UpdateProfileCommand;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// The caller's identity together with the career paths it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileData {
    pub user: UserData,
    pub career_paths: Vec<CareerPathData>,
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ApiSuccess<ProfileData>, ApiError> {
    let user = state.user_service.get_user(&principal.id).await?;
    let career_paths = state.career_path_service.list_own(&principal).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        ProfileData {
            user: UserData::from(&user),
            career_paths: career_paths.iter().map(CareerPathData::from).collect(),
        },
    ))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .user_service
        .update_profile(&principal, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// HTTP request body for a profile update. Missing lists are treated as empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateProfileRequest {
    name: String,
    #[serde(default)]
    interests: Vec<String>,
    #[serde(default)]
    skills: Vec<String>,
    #[serde(default)]
    goals: Vec<String>,
}

impl UpdateProfileRequest {
    fn try_into_command(self) -> Result<UpdateProfileCommand, UserError> {
        Ok(UpdateProfileCommand {
            name: DisplayName::new(self.name)?,
            profile: Profile::new(self.interests, self.skills, self.goals),
        })
    }
}
