//! Error-to-HTTP response conversion.
//!
//! Handlers return `Result<T, AppError>`; anything convertible into
//! [`carmine_common::Error`] can be propagated with `?`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use carmine_common::Error;
use serde_json::json;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError(Error);

impl AppError {
    pub fn inner(&self) -> &Error {
        &self.0
    }
}

impl<E: Into<Error>> From<E> for AppError {
    fn from(e: E) -> Self {
        Self(e.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "Server error in API handler");
        }

        let code = match &self.0 {
            Error::NotFound { .. } => "not_found",
            Error::Validation(_) => "validation_error",
            Error::InvalidId(_) => "invalid_id",
            Error::Io { .. } => "io_error",
            Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.0.to_string(),
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, AppError>;
