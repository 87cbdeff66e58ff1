/// Error handling for the API server
///
/// This module provides a unified error type that maps to the error envelope:
/// every failure renders `{ "status": false, "message": ..., "code": ... }`
/// with an optional `errors` map for validation failures. All handlers return
/// `Result<T, ApiError>` which converts automatically.
///
/// Error codes use a dotted namespace (`general:validation`,
/// `task:not-found`, ...) and each code is pinned to one HTTP status.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Field-keyed validation messages, ready for the `errors` envelope field
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Auth payload validation failed (400, `general:validation`)
    Validation(FieldErrors),

    /// Login credentials did not match (401, `general:invalid_credentials`)
    InvalidCredentials,

    /// Missing or invalid bearer token (401, `general:unauthenticated`)
    Unauthenticated,

    /// Task payload validation failed (422, `validation:failed`)
    TaskValidation(FieldErrors),

    /// Task absent or soft-deleted (404, `task:not-found`)
    TaskNotFound,

    /// Authenticated but not entitled (403, `task:unauthorized`)
    ///
    /// Carries the full per-operation message, e.g.
    /// "You are not authorized to update this task".
    TaskForbidden(&'static str),

    /// Unmatched route (404, `general:not-found`)
    NotFound,

    /// Internal server error (500, `general:server_error`)
    InternalError(String),
}

/// Error envelope body
#[derive(Debug, Serialize)]
struct ErrorBody {
    status: bool,
    message: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<FieldErrors>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(errors) => {
                write!(f, "Validation error: {} fields", errors.len())
            }
            ApiError::InvalidCredentials => write!(f, "Invalid credentials"),
            ApiError::Unauthenticated => write!(f, "Unauthenticated"),
            ApiError::TaskValidation(errors) => {
                write!(f, "Validation failed: {} fields", errors.len())
            }
            ApiError::TaskNotFound => write!(f, "Task not found"),
            ApiError::TaskForbidden(msg) => write!(f, "{}", msg),
            ApiError::NotFound => write!(f, "Not found"),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, errors) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "general:validation",
                "Validation error".to_string(),
                Some(errors),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "general:invalid_credentials",
                "Invalid credentials".to_string(),
                None,
            ),
            ApiError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "general:unauthenticated",
                "Unauthenticated".to_string(),
                None,
            ),
            ApiError::TaskValidation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation:failed",
                "Validation failed".to_string(),
                Some(errors),
            ),
            ApiError::TaskNotFound => (
                StatusCode::NOT_FOUND,
                "task:not-found",
                "Task not found".to_string(),
                None,
            ),
            ApiError::TaskForbidden(msg) => (
                StatusCode::FORBIDDEN,
                "task:unauthorized",
                msg.to_string(),
                None,
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "general:not-found",
                "Not found".to_string(),
                None,
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "general:server_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorBody {
            status: false,
            message,
            code,
            errors,
        });

        (status, body).into_response()
    }
}

/// JSON body extractor whose rejections render the error envelope
///
/// Axum's own `Json` rejection is plain text, so a syntactically invalid
/// body or a wrong content type would escape the response contract. Routing
/// the rejection through `ApiError` keeps those failures in the envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Convert body rejections to API errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let mut errors = FieldErrors::new();
        errors
            .entry("body".to_string())
            .or_default()
            .push(rejection.body_text());
        ApiError::Validation(errors)
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::InternalError(format!("Database error: {}", err))
    }
}

/// Convert password errors to API errors
impl From<taskboard_shared::auth::password::PasswordError> for ApiError {
    fn from(err: taskboard_shared::auth::password::PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
///
/// Token creation failures are internal; any validation failure maps to the
/// unauthenticated envelope.
impl From<taskboard_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: taskboard_shared::auth::jwt::JwtError) -> Self {
        match err {
            taskboard_shared::auth::jwt::JwtError::CreateError(msg) => {
                ApiError::InternalError(format!("Token creation failed: {}", msg))
            }
            _ => ApiError::Unauthenticated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_task_not_found_envelope() {
        let (status, body) = body_of(ApiError::TaskNotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], false);
        assert_eq!(body["message"], "Task not found");
        assert_eq!(body["code"], "task:not-found");
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_forbidden_carries_operation_message() {
        let (status, body) =
            body_of(ApiError::TaskForbidden("You are not authorized to view this task")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "task:unauthorized");
        assert_eq!(body["message"], "You are not authorized to view this task");
    }

    #[tokio::test]
    async fn test_validation_envelope_includes_errors() {
        let mut errors = FieldErrors::new();
        errors.insert("email".to_string(), vec!["Email is required".to_string()]);

        let (status, body) = body_of(ApiError::Validation(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "general:validation");
        assert_eq!(body["message"], "Validation error");
        assert_eq!(body["errors"]["email"][0], "Email is required");
    }

    #[tokio::test]
    async fn test_task_validation_envelope() {
        let mut errors = FieldErrors::new();
        errors.insert(
            "title".to_string(),
            vec!["The title field is required".to_string()],
        );

        let (status, body) = body_of(ApiError::TaskValidation(errors)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "validation:failed");
        assert_eq!(body["message"], "Validation failed");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let (status, body) = body_of(ApiError::InternalError("connection reset".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An internal error occurred");
        assert_eq!(body["code"], "general:server_error");
    }
}
