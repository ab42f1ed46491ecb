//! Application error types and their HTTP mapping.
//!
//! Every failure a handler can produce is one of the kinds below. Controllers
//! and services return `Result<_, AppError>`; the `IntoResponse` impl shapes
//! the `{success, message, errors?}` body the dashboard expects. Unexpected
//! causes ride in the `Internal` variant and are logged server-side only.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// A single failing field in a validation response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug)]
pub enum AppError {
    /// 400 with a per-field error array.
    Validation(Vec<FieldError>),
    /// 400, malformed request outside of field validation.
    BadRequest(String),
    /// 400, identity (email) already taken.
    Duplicate(String),
    /// 401, missing/invalid/expired token or disabled account.
    Unauthorized(String),
    /// 403, authenticated but not allowed.
    Forbidden(String),
    /// 404, unknown or malformed resource id.
    NotFound(String),
    /// 500, unexpected failure. Cause is logged, never serialized.
    Internal(anyhow::Error),
}

impl AppError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation(errors)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Internal(err.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) | Self::Duplicate(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(_) => write!(f, "Validation failed"),
            Self::BadRequest(msg)
            | Self::Duplicate(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg) => write!(f, "{}", msg),
            Self::Internal(err) => write!(f, "{}", err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            Self::Validation(errors) => Json(json!({
                "success": false,
                "message": "Validation failed",
                "errors": errors,
            })),
            Self::Internal(err) => {
                error!(error = %err, "Unhandled internal error");
                Json(json!({
                    "success": false,
                    "message": "Internal server error",
                }))
            }
            other => Json(json!({
                "success": false,
                "message": other.to_string(),
            })),
        };

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound("Resource not found".to_string()),
            other => Self::Internal(other.into()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(collect_field_errors(&errors))
    }
}

/// Flatten `validator` output into the wire-level field error array,
/// keeping every failing field rather than stopping at the first.
pub fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field)),
            })
        })
        .collect();

    // Deterministic ordering for clients and tests
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Dto {
        #[validate(length(min = 3, message = "name must be at least 3 characters"))]
        name: String,
        #[validate(email(message = "email must be a valid email address"))]
        email: String,
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::validation(vec![]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::duplicate("dup").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::unauthorized("no").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::forbidden("no").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::not_found("no").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_collect_field_errors_reports_every_field() {
        let dto = Dto {
            name: "ab".to_string(),
            email: "not-an-email".to_string(),
        };

        let errors = dto.validate().unwrap_err();
        let fields = collect_field_errors(&errors);

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field, "email");
        assert_eq!(fields[1].field, "name");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
