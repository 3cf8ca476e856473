use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::inbound::http::router::AppState;

/// Exchange credentials for a session token.
///
/// Unknown email and wrong password produce the same 401 body.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<TokenResponseData>, ApiError> {
    state
        .user_service
        .login(&body.email, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|session| {
            ApiSuccess::new(
                StatusCode::OK,
                TokenResponseData {
                    token: session.token,
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}
