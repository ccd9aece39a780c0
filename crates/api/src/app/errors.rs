use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use chirpy_core::DomainError;

/// Map a core error kind to its HTTP response.
///
/// Internal errors are logged and replaced by a generic message.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let status = match &err {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Authentication(_) => StatusCode::UNAUTHORIZED,
        DomainError::Authorization(_) => StatusCode::FORBIDDEN,
        DomainError::NotFound => StatusCode::NOT_FOUND,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Internal(detail) => {
            tracing::error!(%detail, "internal error");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                err.code(),
                "Something went wrong",
            );
        }
    };
    json_error(status, err.code(), err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (DomainError::validation("x"), StatusCode::BAD_REQUEST),
            (DomainError::authentication("x"), StatusCode::UNAUTHORIZED),
            (DomainError::authorization("x"), StatusCode::FORBIDDEN),
            (DomainError::NotFound, StatusCode::NOT_FOUND),
            (DomainError::conflict("x"), StatusCode::CONFLICT),
            (DomainError::internal("disk on fire"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(domain_error_to_response(err).status(), status);
        }
    }
}
