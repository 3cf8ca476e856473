use auth::JwtError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::models::Principal;
use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Why a request was turned away by an authorization gate.
///
/// The variant is logged; the client only ever sees the status code and a
/// fixed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRejection {
    MissingToken,
    MalformedHeader,
    InvalidToken(JwtError),
    InvalidSubject(String),
    UnknownIdentity(UserId),
    NotAuthenticated,
    Forbidden(UserId),
    StoreUnavailable(String),
    Internal(String),
}

impl AuthRejection {
    fn reason(&self) -> String {
        match self {
            AuthRejection::MissingToken => "no_token".to_string(),
            AuthRejection::MalformedHeader => "malformed_authorization_header".to_string(),
            AuthRejection::InvalidToken(JwtError::Expired) => "expired".to_string(),
            AuthRejection::InvalidToken(JwtError::BadSignature) => "bad_signature".to_string(),
            AuthRejection::InvalidToken(e) => format!("malformed: {}", e),
            AuthRejection::InvalidSubject(sub) => format!("invalid_subject: {}", sub),
            AuthRejection::UnknownIdentity(id) => format!("unknown_identity: {}", id),
            AuthRejection::NotAuthenticated => "no_principal".to_string(),
            AuthRejection::Forbidden(id) => format!("not_admin: {}", id),
            AuthRejection::StoreUnavailable(e) => format!("store_unavailable: {}", e),
            AuthRejection::Internal(e) => format!("internal: {}", e),
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let reason = self.reason();

        let error = match self {
            AuthRejection::Forbidden(_) => {
                tracing::warn!(%reason, "Request forbidden");
                ApiError::Forbidden("Forbidden".to_string())
            }
            AuthRejection::StoreUnavailable(_) => {
                tracing::error!(%reason, "Identity resolution failed");
                ApiError::ServiceUnavailable("Service temporarily unavailable".to_string())
            }
            AuthRejection::Internal(_) => {
                tracing::error!(%reason, "Identity resolution failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
            _ => {
                tracing::warn!(%reason, "Request unauthorized");
                ApiError::Unauthorized("Unauthorized".to_string())
            }
        };

        error.into_response()
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthRejection::MissingToken)?
        .to_str()
        .map_err(|_| AuthRejection::MalformedHeader)?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthRejection::MalformedHeader),
    }
}

/// Verify the bearer token and resolve its subject against the store.
///
/// The returned principal carries the stored role, so a demotion or deletion
/// takes effect on the next request even while older tokens are unexpired.
pub async fn resolve_principal(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Principal, AuthRejection> {
    let token = bearer_token(headers)?;

    let claims = state
        .authenticator
        .verify_token(token)
        .map_err(AuthRejection::InvalidToken)?;

    let user_id = UserId::from_string(&claims.sub)
        .map_err(|_| AuthRejection::InvalidSubject(claims.sub.clone()))?;

    let user = state
        .user_service
        .get_user(&user_id)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => AuthRejection::UnknownIdentity(user_id),
            e if e.is_retriable() => AuthRejection::StoreUnavailable(e.to_string()),
            e => AuthRejection::Internal(e.to_string()),
        })?;

    if user.role != claims.role {
        tracing::debug!(
            user_id = %user.id,
            token_role = %claims.role,
            stored_role = %user.role,
            "Token role is stale; using stored role"
        );
    }

    Ok(user.principal())
}

/// Authenticated gate: attaches the resolved `Principal` to the request.
pub async fn require_authenticated(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let principal = resolve_principal(&state, req.headers()).await?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Admin gate. Must run after `require_authenticated`; it reads the attached
/// principal and never looks at the token again.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AuthRejection> {
    let principal = req
        .extensions()
        .get::<Principal>()
        .copied()
        .ok_or(AuthRejection::NotAuthenticated)?;

    if !principal.is_admin() {
        return Err(AuthRejection::Forbidden(principal.id));
    }

    Ok(next.run(req).await)
}
