use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
    response::IntoResponse,
};

use chirpy_chirps::ChirpQuery;
use chirpy_core::ChirpId;

use crate::app::{dto, errors, services};
use crate::context::PrincipalContext;

pub async fn create_chirp(
    Extension(services): Extension<Arc<services::AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateChirpRequest>,
) -> axum::response::Response {
    let chirps = services.chirps.clone();
    let author_id = principal.user_id();
    match services::blocking(move || chirps.create(&body.body, author_id)).await {
        Ok(chirp) => (StatusCode::CREATED, Json(chirp)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_chirps(
    Extension(services): Extension<Arc<services::AppServices>>,
    Query(params): Query<dto::ListChirpsParams>,
) -> axum::response::Response {
    let query = match ChirpQuery::parse(params.author_id.as_deref(), params.sort.as_deref()) {
        Ok(q) => q,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let chirps = services.chirps.clone();
    match services::blocking(move || chirps.list(&query)).await {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_chirp(
    Extension(services): Extension<Arc<services::AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match id.parse::<ChirpId>() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let chirps = services.chirps.clone();
    match services::blocking(move || chirps.get(id)).await {
        Ok(chirp) => (StatusCode::OK, Json(chirp)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_chirp(
    Extension(services): Extension<Arc<services::AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match id.parse::<ChirpId>() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let chirps = services.chirps.clone();
    let requester = principal.user_id();
    match services::blocking(move || chirps.delete(id, requester)).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
