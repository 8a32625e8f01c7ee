//! API error types with HTTP response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;
use serde::Serialize;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Missing or invalid bearer token.
    Unauthorized(String),
    /// Domain logic error.
    Domain(DomainError),
}

/// Failure body: `{success: false, message, error?}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiError {
    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        let reject = |status, message: String| {
            (
                status,
                ErrorBody {
                    success: false,
                    message,
                    error: None,
                },
            )
        };

        match self {
            ApiError::BadRequest(msg) => reject(StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unauthorized(msg) => reject(StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Domain(err) => match err {
                DomainError::Validation(_) | DomainError::InsufficientStock { .. } => {
                    reject(StatusCode::BAD_REQUEST, err.to_string())
                }
                DomainError::NotFound { .. } => reject(StatusCode::NOT_FOUND, err.to_string()),
                DomainError::PetUnavailable(_) | DomainError::StockConflict { .. } => {
                    reject(StatusCode::CONFLICT, err.to_string())
                }
                DomainError::CompensationFailed { step, .. } => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        success: false,
                        message: format!("The request failed and could not be undone at '{step}'."),
                        error: Some(err.to_string()),
                    },
                ),
                DomainError::Store(_) | DomainError::Serialization(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        success: false,
                        message: "An error occurred while processing the request.".to_string(),
                        error: Some(err.to_string()),
                    },
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        if status.is_server_error() {
            tracing::error!(
                status = status.as_u16(),
                error = body.error.as_deref().unwrap_or_default(),
                "internal server error"
            );
        }
        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
