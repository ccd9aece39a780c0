use std::sync::Arc;

use axum::{Extension, Json, http::StatusCode, response::IntoResponse};

use crate::app::{dto, errors, services};
use crate::context::PrincipalContext;

pub async fn create_user(
    Extension(services): Extension<Arc<services::AppServices>>,
    Json(body): Json<dto::CredentialsRequest>,
) -> axum::response::Response {
    let accounts = services.accounts.clone();
    match services::blocking(move || accounts.register(&body.email, &body.password)).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<services::AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CredentialsRequest>,
) -> axum::response::Response {
    let accounts = services.accounts.clone();
    let user_id = principal.user_id();
    match services::blocking(move || accounts.update(user_id, &body.email, &body.password)).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
