use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::CareerPathData;
use crate::domain::user::models::Principal;
use crate::inbound::http::router::AppState;

pub async fn list_career_paths(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ApiSuccess<Vec<CareerPathData>>, ApiError> {
    state
        .career_path_service
        .list_own(&principal)
        .await
        .map_err(ApiError::from)
        .map(|paths| {
            ApiSuccess::new(StatusCode::OK, paths.iter().map(CareerPathData::from).collect())
        })
}
