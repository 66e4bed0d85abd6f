/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts to
/// the appropriate status code and JSON body.
///
/// # Taxonomy
///
/// | Variant | Status | Meaning |
/// |---|---|---|
/// | `BadRequest` | 400 | malformed/missing input |
/// | `InvalidState` | 400 | operation not legal from the entity's current state |
/// | `Unauthorized` | 401 | no or invalid session |
/// | `Forbidden` | 403 | authenticated but lacking permission |
/// | `NotFound` | 404 | entity absent, or masked across the tenant boundary |
/// | `RegistrationExpired` | 404 | dangling registration token; response clears the cookie |
/// | `ValidationError` | 400 | field-level validation failures |
/// | `InternalError` | 500 | unexpected failure; logged, opaque to the caller |

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::app::REGISTRATION_COOKIE;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Operation not legal from the current state (400)
    InvalidState(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// The registration token no longer maps to a record (404);
    /// the response clears the registration cookie so the client starts over
    RegistrationExpired,

    /// Field-level validation errors (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::RegistrationExpired => write!(f, "Registration not found"),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::InvalidState(_) | ApiError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) | ApiError::RegistrationExpired => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Handle the dangling registration token separately so the response
        // also clears the cookie.
        if let ApiError::RegistrationExpired = self {
            let body = Json(ErrorResponse {
                error: "registration_not_found".to_string(),
                message: "Registration not found; please start over".to_string(),
                details: None,
            });

            let mut response = (StatusCode::NOT_FOUND, body).into_response();
            response.headers_mut().insert(
                header::SET_COOKIE,
                header::HeaderValue::from_str(&format!(
                    "{REGISTRATION_COOKIE}=; Path=/; Max-Age=0; HttpOnly"
                ))
                .expect("static cookie string is a valid header value"),
            );
            return response;
        }

        let status = self.status_code();
        let (error_code, message, details) = match self {
            ApiError::BadRequest(msg) => ("bad_request", msg, None),
            ApiError::InvalidState(msg) => ("invalid_state", msg, None),
            ApiError::Unauthorized(msg) => ("unauthorized", msg, None),
            ApiError::Forbidden(msg) => ("forbidden", msg, None),
            ApiError::NotFound(msg) => ("not_found", msg, None),
            ApiError::RegistrationExpired => unreachable!("handled above"),
            ApiError::ValidationError(errors) => (
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but never expose details to clients.
                tracing::error!("Internal error: {}", msg);
                (
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert operation errors to API errors
impl From<siteloft_shared::ops::OpError> for ApiError {
    fn from(err: siteloft_shared::ops::OpError) -> Self {
        use siteloft_shared::ops::OpError;

        match err {
            OpError::NotFound(msg) => ApiError::NotFound(msg.to_string()),
            OpError::Forbidden(msg) => ApiError::Forbidden(msg),
            OpError::InvalidState(msg) => ApiError::InvalidState(msg.to_string()),
            OpError::Validation(msg) => ApiError::BadRequest(msg.to_string()),
            OpError::RegistrationExpired => ApiError::RegistrationExpired,
            OpError::Slug(reason) => ApiError::BadRequest(reason.to_string()),
            OpError::Database(err) => err.into(),
        }
    }
}

/// Convert request validation failures to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siteloft_shared::ops::OpError;
    use siteloft_shared::slug::SlugError;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Member not found".to_string());
        assert_eq!(err.to_string(), "Not found: Member not found");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        // InvalidState is a 400, not a 409 or 422.
        assert_eq!(
            ApiError::InvalidState(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized(String::new()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden(String::new()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound(String::new()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::RegistrationExpired.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::ValidationError(Vec::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_op_error_conversion() {
        let err: ApiError = OpError::NotFound("Member not found").into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = OpError::InvalidState("Member is not active").into();
        assert!(matches!(err, ApiError::InvalidState(_)));

        let err: ApiError = OpError::Slug(SlugError::Taken).into();
        match err {
            ApiError::BadRequest(msg) => assert!(msg.contains("taken")),
            other => panic!("expected BadRequest, got {other:?}"),
        }

        let err: ApiError = OpError::RegistrationExpired.into();
        assert!(matches!(err, ApiError::RegistrationExpired));
    }
}
