//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: core service construction from `AppConfig`
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use chirpy_infra::{AppConfig, StoreError};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> Result<Router, StoreError> {
    let services = Arc::new(services::AppServices::from_config(config)?);
    Ok(router(services))
}

/// Router over already-constructed services.
pub fn router(services: Arc<services::AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        sessions: services.sessions.clone(),
    };
    let auth = axum::middleware::from_fn_with_state(auth_state, middleware::auth_middleware);

    // `route_layer` only wraps the methods registered before it, so each
    // protected handler is added first and the public ones after.
    Router::new()
        .route("/api/healthz", get(routes::system::health))
        .route(
            "/api/users",
            put(routes::users::update_user)
                .route_layer(auth.clone())
                .post(routes::users::create_user),
        )
        .route("/api/login", post(routes::auth::login))
        .route("/api/refresh", post(routes::auth::refresh))
        .route("/api/revoke", post(routes::auth::revoke))
        .route(
            "/api/chirps",
            post(routes::chirps::create_chirp)
                .route_layer(auth.clone())
                .get(routes::chirps::list_chirps),
        )
        .route(
            "/api/chirps/:id",
            delete(routes::chirps::delete_chirp)
                .route_layer(auth)
                .get(routes::chirps::get_chirp),
        )
        .route("/api/polka/webhooks", post(routes::polka::webhook))
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
