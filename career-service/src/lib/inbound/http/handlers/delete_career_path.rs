use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use crate::career_path::errors::CareerPathError;
use crate::career_path::models::CareerPathId;
use crate::domain::user::models::Principal;
use crate::inbound::http::router::AppState;

pub async fn delete_career_path(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let career_path_id = CareerPathId::from_string(&id).map_err(CareerPathError::from)?;

    state
        .career_path_service
        .delete(&principal, &career_path_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, ()))
}
