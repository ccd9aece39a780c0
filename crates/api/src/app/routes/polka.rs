//! Payment provider webhook: promotes users on `user.upgraded`.

use std::sync::Arc;

use axum::{
    Extension, Json,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use chirpy_core::UserId;

use crate::app::{dto, errors, services};
use crate::middleware::authorization_value;

pub const UPGRADE_EVENT: &str = "user.upgraded";

const API_KEY_SCHEME: &str = "ApiKey";

pub async fn webhook(
    Extension(services): Extension<Arc<services::AppServices>>,
    headers: HeaderMap,
    Json(body): Json<dto::PolkaWebhookRequest>,
) -> axum::response::Response {
    let raw = match authorization_value(&headers) {
        Ok(raw) => raw,
        Err(resp) => return resp,
    };

    if !api_key_matches(raw, services.polka_api_key.as_deref()) {
        tracing::warn!("webhook rejected: bad api key");
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "invalid api key");
    }

    if body.event != UPGRADE_EVENT {
        tracing::debug!(event = %body.event, "webhook event ignored");
        return StatusCode::NO_CONTENT.into_response();
    }

    let accounts = services.accounts.clone();
    let user_id = UserId::new(body.data.user_id);
    match services::blocking(move || accounts.promote(user_id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// `ApiKey <key>` against the configured key; no configured key rejects all.
fn api_key_matches(raw: &str, expected: Option<&str>) -> bool {
    let Some(expected) = expected else {
        return false;
    };
    let mut parts = raw.split(' ');
    matches!(
        (parts.next(), parts.next(), parts.next()),
        (Some(API_KEY_SCHEME), Some(key), None) if key == expected
    )
}
