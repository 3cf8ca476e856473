use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware::from_fn;
use axum::middleware::from_fn_with_state;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::change_password::change_password;
use super::handlers::create_career_path::create_career_path;
use super::handlers::current_user::current_user;
use super::handlers::delete_career_path::delete_career_path;
use super::handlers::delete_user::delete_user;
use super::handlers::list_all_career_paths::list_all_career_paths;
use super::handlers::list_career_paths::list_career_paths;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::profile::get_profile;
use super::handlers::profile::update_profile;
use super::handlers::register::register;
use super::handlers::stats::stats;
use super::handlers::update_role::update_role;
use super::middleware::require_admin;
use super::middleware::require_authenticated;
use crate::career_path::ports::CareerPathServicePort;
use crate::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub career_path_service: Arc<dyn CareerPathServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    career_path_service: Arc<dyn CareerPathServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        user_service,
        career_path_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login));

    let authenticated_routes = Router::new()
        .route("/api/auth/user", get(current_user))
        .route("/api/users/password", put(change_password))
        .route("/api/users/profile", get(get_profile).put(update_profile))
        .route(
            "/api/career-paths",
            get(list_career_paths).post(create_career_path),
        )
        .route("/api/career-paths/:career_path_id", delete(delete_career_path))
        .route_layer(from_fn_with_state(state.clone(), require_authenticated));

    // Layers wrap outward: the authenticated gate runs before the admin gate.
    let admin_routes = Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/:user_id", put(update_role).delete(delete_user))
        .route("/api/admin/career-paths", get(list_all_career_paths))
        .route("/api/admin/stats", get(stats))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), require_authenticated));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(admin_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
