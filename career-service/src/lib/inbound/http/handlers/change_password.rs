use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::ChangePasswordCommand;
use crate::domain::user::models::Password;
use crate::domain::user::models::Principal;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn change_password(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    let command = body.try_into_command()?;

    state
        .user_service
        .change_password(&principal, command)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

impl ChangePasswordRequest {
    fn try_into_command(self) -> Result<ChangePasswordCommand, UserError> {
        Ok(ChangePasswordCommand {
            current_password: self.current_password,
            new_password: Password::new(self.new_password)?,
        })
    }
}
