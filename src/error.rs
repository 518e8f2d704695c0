// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;
use std::fmt;

use crate::views::{self, NoticeKind};

/// Global Application Error Enum.
/// Covers the failures that end a request with an error page. Policy rejections
/// (closed quiz, wrong code, missing session) are rendered as notices or redirects instead.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 401 Unauthorized
    AuthError(String),

    // 404 Not Found
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Converts the error into an HTML page with the matching status code.
/// Internal details are logged and replaced by a generic message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::AuthError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = views::page(
            status.canonical_reason().unwrap_or("Error"),
            html! {
                (views::notice(NoticeKind::Danger, &error_message))
                a href="/" class="btn btn-outline-secondary w-100" { "Back to start" }
            },
            false,
        );

        (status, body).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Allows using `?` operator on database queries.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

/// Returns true when the error is a UNIQUE constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// First human-readable message from a failed validation, for inline form notices.
pub fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Please check the form and try again.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_map_to_status_codes() {
        let cases = [
            (AppError::InternalServerError("db down".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::AuthError("Invalid username or password".into()), StatusCode::UNAUTHORIZED),
            (AppError::NotFound("Question not found".into()), StatusCode::NOT_FOUND),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn row_not_found_is_internal() {
        let error = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(error, AppError::InternalServerError(_)));
    }
}
