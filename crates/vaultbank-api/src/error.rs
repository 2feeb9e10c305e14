//! API error handling
//!
//! Every failure renders as the standard response envelope with
//! `success: false`. Internal detail is logged, never sent to clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error taxonomy
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed field-level validation
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Malformed or otherwise unacceptable request
    #[error("{0}")]
    BadRequest(String),

    /// A uniqueness rule was violated
    #[error("{0}")]
    Conflict(String),

    /// Login failed; deliberately silent about which part was wrong
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No usable session token accompanied the request
    #[error("{0}")]
    Unauthenticated(String),

    /// The session resolved but its principal may not act
    #[error("{0}")]
    Forbidden(String),

    /// Resource absent within the caller's own scope
    #[error("{0}")]
    NotFound(String),

    /// Per-account wallet ceiling reached
    #[error("You currently have the maximum number of wallets")]
    QuotaExceeded,

    /// The storage layer failed mid-operation
    #[error("A communication error occurred with the data source")]
    Upstream,

    /// Unexpected internal failure; the payload carries detail for logs only
    #[error("An error has occurred while processing the request")]
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::BadRequest(_)
            | Self::Conflict(_)
            | Self::InvalidCredentials
            | Self::QuotaExceeded => StatusCode::BAD_REQUEST,

            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,

            Self::Forbidden(_) => StatusCode::FORBIDDEN,

            Self::NotFound(_) => StatusCode::NOT_FOUND,

            Self::Upstream => StatusCode::BAD_GATEWAY,

            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// One field-level validation failure
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    /// Offending request field
    pub field: String,
    /// What was wrong with it
    pub message: String,
}

/// Error response envelope
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always false for errors
    pub success: bool,
    /// Human-readable error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Field-level validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            Self::Validation(errors) => ErrorResponse {
                success: false,
                message: None,
                errors: Some(errors),
            },
            Self::Internal(detail) => {
                tracing::error!(detail = %detail, "Internal error");
                ErrorResponse {
                    success: false,
                    message: Some(
                        "An error has occurred while processing the request".to_string(),
                    ),
                    errors: None,
                }
            }
            other => ErrorResponse {
                success: false,
                message: Some(other.to_string()),
                errors: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<vaultbank_auth::AuthError> for ApiError {
    fn from(err: vaultbank_auth::AuthError) -> Self {
        use vaultbank_auth::AuthError;
        match err {
            AuthError::MissingToken => {
                Self::Unauthenticated("Failed when parsing auth token from request".to_string())
            }
            AuthError::InvalidToken | AuthError::TokenExpired => Self::Unauthenticated(
                "The auth token provided has expired or is invalid".to_string(),
            ),
            AuthError::TokenSigning
            | AuthError::PasswordHashingFailed
            | AuthError::PasswordVerificationFailed => Self::Internal(err.to_string()),
        }
    }
}

impl From<vaultbank_db::DbError> for ApiError {
    fn from(err: vaultbank_db::DbError) -> Self {
        match err {
            vaultbank_db::DbError::Duplicate(msg) => Self::Conflict(msg),
            other => {
                tracing::error!(error = ?other, "Database error");
                Self::Upstream
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors: Vec<FieldError> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                })
            })
            .collect();
        // field_errors() iterates a HashMap, so order the output for clients.
        errors.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
        Self::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::InvalidCredentials.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::QuotaExceeded.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Conflict("taken".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthenticated("no token".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("gone".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("missing".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::Upstream.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_not_in_display() {
        let err = ApiError::Internal("connection string with password".to_string());
        assert_eq!(
            err.to_string(),
            "An error has occurred while processing the request"
        );
    }

    #[test]
    fn test_auth_error_mapping() {
        use vaultbank_auth::AuthError;

        let err = ApiError::from(AuthError::MissingToken);
        assert!(matches!(err, ApiError::Unauthenticated(_)));
        assert_eq!(err.to_string(), "Failed when parsing auth token from request");

        let err = ApiError::from(AuthError::TokenExpired);
        assert_eq!(
            err.to_string(),
            "The auth token provided has expired or is invalid"
        );

        let err = ApiError::from(AuthError::PasswordHashingFailed);
        assert!(matches!(err, ApiError::Internal(_)));
    }

    #[test]
    fn test_db_error_mapping() {
        use vaultbank_db::DbError;

        let err = ApiError::from(DbError::Duplicate("Email taken".to_string()));
        assert!(matches!(err, ApiError::Conflict(_)));

        let err = ApiError::from(DbError::Connection("refused".to_string()));
        assert!(matches!(err, ApiError::Upstream));

        let err = ApiError::from(DbError::NotFound("row vanished".to_string()));
        assert!(matches!(err, ApiError::Upstream));
    }

    #[test]
    fn test_validation_envelope_shape() {
        let err = ApiError::Validation(vec![FieldError {
            field: "email".to_string(),
            message: "Invalid email address".to_string(),
        }]);

        if let ApiError::Validation(errors) = err {
            let body = ErrorResponse {
                success: false,
                message: None,
                errors: Some(errors),
            };
            let json = serde_json::to_value(&body).unwrap();
            assert_eq!(json["success"], false);
            assert!(json.get("message").is_none());
            assert_eq!(json["errors"][0]["field"], "email");
        } else {
            unreachable!();
        }
    }
}
