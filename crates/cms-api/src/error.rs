// ============================================================================
// CMS API - Error Responses
// File: crates/cms-api/src/error.rs
// ============================================================================

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use cms_core::error::DomainError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "BadRequest", msg)
            }
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, "Unauthorized", msg)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, "NotFound", msg)
            }
            ApiError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, "Conflict", msg)
            }
            // Server-side details stay in the logs
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DatabaseError",
                    "A database error occurred".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!("Service unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "ServiceUnavailable", msg)
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        let message = error.to_string();
        match error {
            DomainError::MenuItemNotFound(_)
            | DomainError::ParentNotFound(_)
            | DomainError::MenuLocationNotFound(_) => ApiError::NotFound(message),
            DomainError::MaxDepthExceeded { .. }
            | DomainError::InvalidMove(_)
            | DomainError::ValidationError(_)
            | DomainError::ReferenceViolation(_) => ApiError::BadRequest(message),
            DomainError::SlugAlreadyExists(_) => ApiError::Conflict(message),
            DomainError::CorruptedTree(_) => ApiError::InternalError(message),
            DomainError::DatabaseError(_) => ApiError::DatabaseError(message),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(errors.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn status_of(error: DomainError) -> StatusCode {
        ApiError::from(error).into_response().status()
    }

    #[test]
    fn test_domain_error_status_mapping() {
        let id = Uuid::new_v4();
        assert_eq!(status_of(DomainError::MenuItemNotFound(id)), StatusCode::NOT_FOUND);
        assert_eq!(status_of(DomainError::ParentNotFound(id)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(DomainError::MaxDepthExceeded { depth: 4, max: 3 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::InvalidMove("no".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DomainError::SlugAlreadyExists("header".to_string())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(DomainError::CorruptedTree(id)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(DomainError::DatabaseError("down".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_depth_message_is_preserved() {
        let error = ApiError::from(DomainError::MaxDepthExceeded { depth: 4, max: 3 });
        match error {
            ApiError::BadRequest(msg) => assert!(msg.starts_with("Maximum menu depth exceeded")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
