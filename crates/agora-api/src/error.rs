use agora_core::CoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Transport rendering of failures. Every variant becomes a status code
/// plus a JSON body of the form `{ "error": "..." }`; store-level
/// failures are logged and reported without their internals.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(CoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Core(CoreError::Forbidden(_)) => StatusCode::FORBIDDEN,
            ApiError::Core(CoreError::Conflict(_)) | ApiError::Conflict(_) => {
                StatusCode::CONFLICT
            }
            ApiError::Core(CoreError::Validation(_)) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Core(CoreError::Store(_)) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = ?self, "request failed");
            return (
                status,
                Json(serde_json::json!({ "error": "internal server error" })),
            )
                .into_response();
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn core_errors_map_to_their_status_codes() {
        assert_eq!(
            status_of(ApiError::Core(CoreError::NotFound("board"))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::Core(CoreError::Forbidden("nope"))),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(ApiError::Core(CoreError::Validation("bad".into()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::Core(CoreError::Conflict("dup".into()))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApiError::Core(CoreError::Store(anyhow!("io")))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn transport_errors_map_directly() {
        assert_eq!(
            status_of(ApiError::Unauthorized("no token")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ApiError::BadRequest("empty".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::Conflict("taken".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApiError::Internal(anyhow!("boom"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
