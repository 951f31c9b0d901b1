//! API error type with structured JSON responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cracare_core::error::CraError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] CraError),

    /// Malformed request: unparsable body, path or query string.
    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail),
            ApiError::Domain(err) => match err {
                CraError::Validation { message } => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
                }
                CraError::AuthenticationFailed { reason } => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", reason)
                }
                CraError::AuthorizationDenied { reason } => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", reason)
                }
                err @ CraError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                }
                err @ CraError::AlreadyExists { .. } => {
                    (StatusCode::CONFLICT, "CONFLICT", err.to_string())
                }
                err @ (CraError::Database(_) | CraError::Crypto(_) | CraError::Internal(_)) => {
                    tracing::error!(error = %err, "API internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL",
                        "An internal error occurred".to_string(),
                    )
                }
            },
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn validation_maps_to_400() {
        let response = ApiError::from(CraError::validation("first_name is required")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["message"], "first_name is required");
    }

    #[tokio::test]
    async fn status_mapping_follows_the_error_kind() {
        let cases = [
            (
                CraError::AuthenticationFailed {
                    reason: "x".into(),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (CraError::denied("x"), StatusCode::FORBIDDEN),
            (CraError::not_found("staff", "1"), StatusCode::NOT_FOUND),
            (
                CraError::AlreadyExists {
                    entity: "staff".into(),
                },
                StatusCode::CONFLICT,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = ApiError::from(CraError::Database("connection reset".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }
}
