use std::sync::Arc;

use axum::{Extension, Json, http::HeaderMap, http::StatusCode, response::IntoResponse};

use crate::app::{dto, errors, services};
use crate::middleware::authorization_value;

pub async fn login(
    Extension(services): Extension<Arc<services::AppServices>>,
    Json(body): Json<dto::CredentialsRequest>,
) -> axum::response::Response {
    let accounts = services.accounts.clone();
    match services::blocking(move || accounts.login(&body.email, &body.password)).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Exchange a refresh token (in the `Authorization` header) for a new access token.
pub async fn refresh(
    Extension(services): Extension<Arc<services::AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let raw = match authorization_value(&headers) {
        Ok(raw) => raw.to_string(),
        Err(resp) => return resp,
    };

    let sessions = services.sessions.clone();
    match services::blocking(move || sessions.refresh(&raw)).await {
        Ok(token) => (StatusCode::OK, Json(dto::TokenResponse { token })).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn revoke(
    Extension(services): Extension<Arc<services::AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let raw = match authorization_value(&headers) {
        Ok(raw) => raw.to_string(),
        Err(resp) => return resp,
    };

    let sessions = services.sessions.clone();
    match services::blocking(move || sessions.revoke(&raw)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
