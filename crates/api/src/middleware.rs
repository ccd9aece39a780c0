use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use chirpy_infra::SessionManager;

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub sessions: Arc<SessionManager>,
}

/// Require a valid access token and expose the caller as `PrincipalContext`.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let raw = match authorization_value(req.headers()) {
        Ok(raw) => raw.to_string(),
        Err(resp) => return resp,
    };

    let user_id = match state.sessions.authenticate(&raw) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "rejected access token");
            return errors::domain_error_to_response(e);
        }
    };

    req.extensions_mut().insert(PrincipalContext::new(user_id));
    next.run(req).await
}

/// Raw `Authorization` header value (scheme and token are split by the core).
pub fn authorization_value(headers: &HeaderMap) -> Result<&str, Response> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| {
            errors::json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "missing authorization header")
        })?;

    header.to_str().map_err(|_| {
        errors::json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "invalid token")
    })
}
