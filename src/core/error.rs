use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
#[allow(dead_code)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// One message per offending field, e.g. `phone: Phone number must be exactly 10 digits`
    #[error("Invalid fields: {}", .0.join("; "))]
    InvalidFields(Vec<String>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::InvalidFields(field_messages(&errors))
    }
}

/// Flatten validator errors into sorted `field: message` strings
pub fn field_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    for (field, kind) in errors.errors() {
        if let ValidationErrorsKind::Field(field_errors) = kind {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                if *field == "__all__" {
                    messages.push(message);
                } else {
                    messages.push(format!("{}: {}", field, message));
                }
            }
        }
    }
    messages.sort();
    messages
}

/// Map constraint violations to user-facing errors.
///
/// `conflict_message` is used for unique violations (23505); foreign key
/// violations (23503) become a bad request. Anything else stays a database error.
pub fn handle_db_error(e: sqlx::Error, conflict_message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code() == Some(Cow::Borrowed("23505")) {
            return AppError::Conflict(conflict_message.to_string());
        }

        if db_err.code() == Some(Cow::Borrowed("23503")) {
            return AppError::BadRequest("Referenced record does not exist.".to_string());
        }
    }

    tracing::error!("Database error: {:?}", e);
    AppError::Database(e)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::InvalidFields(errors) => (
                StatusCode::BAD_REQUEST,
                "Please correct the highlighted fields".to_string(),
                Some(errors),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Auth(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Unauthorized(ref msg) => (StatusCode::UNAUTHORIZED, msg.clone(), None),
            AppError::Forbidden(ref msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_field_messages_are_sorted_and_prefixed() {
        let mut errors = ValidationErrors::new();
        let mut phone = ValidationError::new("phone");
        phone.message = Some("Phone number must be exactly 10 digits".into());
        errors.add("phone", phone);
        errors.add("city", ValidationError::new("required"));

        let messages = field_messages(&errors);

        assert_eq!(
            messages,
            vec![
                "city: required".to_string(),
                "phone: Phone number must be exactly 10 digits".to_string(),
            ]
        );
    }

    #[test]
    fn test_invalid_fields_maps_to_bad_request() {
        let response = AppError::InvalidFields(vec!["phone: bad".to_string()]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_schema_level_errors_have_no_field_prefix() {
        let mut errors = ValidationErrors::new();
        let mut mismatch = ValidationError::new("password_mismatch");
        mismatch.message = Some("Passwords do not match".into());
        errors.add("__all__", mismatch);

        assert_eq!(
            field_messages(&errors),
            vec!["Passwords do not match".to_string()]
        );
    }
}
