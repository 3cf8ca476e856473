use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::CareerPathData;
use crate::career_path::errors::CareerPathError;
use crate::career_path::models::CreateCareerPathCommand;
use crate::career_path::models::Description;
use crate::career_path::models::Title;
use crate::domain::user::models::Principal;
use crate::inbound::http::router::AppState;

pub async fn create_career_path(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<CreateCareerPathRequest>,
) -> Result<ApiSuccess<CareerPathData>, ApiError> {
    state
        .career_path_service
        .create(&principal, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref career_path| ApiSuccess::new(StatusCode::CREATED, career_path.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateCareerPathRequest {
    title: String,
    description: String,
    #[serde(default)]
    required_skills: Vec<String>,
}

impl CreateCareerPathRequest {
    fn try_into_command(self) -> Result<CreateCareerPathCommand, CareerPathError> {
        let title = Title::new(self.title)?;
        let description = Description::new(self.description)?;
        Ok(CreateCareerPathCommand::new(
            title,
            description,
            self.required_skills,
        ))
    }
}
