use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::CareerPathData;
use super::UserData;
use crate::domain::user::models::Principal;
use crate::inbound::http::router::AppState;

const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsResponseData {
    pub total_users: usize,
    pub total_career_paths: usize,
    pub recent_users: Vec<UserData>,
    pub recent_career_paths: Vec<CareerPathData>,
}

/// Admin dashboard counters. Both listings arrive newest first.
pub async fn stats(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ApiSuccess<StatsResponseData>, ApiError> {
    let users = state.user_service.list_users(&principal).await?;
    let career_paths = state.career_path_service.list_all(&principal).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        StatsResponseData {
            total_users: users.len(),
            total_career_paths: career_paths.len(),
            recent_users: users.iter().take(RECENT_LIMIT).map(UserData::from).collect(),
            recent_career_paths: career_paths
                .iter()
                .take(RECENT_LIMIT)
                .map(CareerPathData::from)
                .collect(),
        },
    ))
}
