use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::Principal;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ApiSuccess<Vec<UserData>>, ApiError> {
    state
        .user_service
        .list_users(&principal)
        .await
        .map_err(ApiError::from)
        .map(|users| {
            ApiSuccess::new(StatusCode::OK, users.iter().map(UserData::from).collect())
        })
}
