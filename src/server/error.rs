//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`crate::error::Error`] so that route
//! handlers can return `Result<T, AppError>` directly.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::Error;

/// Wrapper so we can implement `IntoResponse` for the app error type.
pub struct AppError(Error);

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl From<clipcheck_av::Error> for AppError {
    fn from(e: clipcheck_av::Error) -> Self {
        Self(Error::from(e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Internal causes stay server-side; the client only sees the
        // display form, which for 5xx errors is a generic summary.
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self.0, "server error in API handler");
        }

        let code = match &self.0 {
            Error::NotFound { .. } => "not_found",
            Error::Validation(_) => "validation_error",
            Error::Probe(_) => "probe_error",
            Error::Tool { .. } => "tool_error",
            Error::Io { .. } => "io_error",
            Error::Internal(_) => "internal_error",
        };

        let message = if status.is_server_error() {
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        let body = json!({
            "success": false,
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_produces_404() {
        let err = AppError(Error::not_found("file", "abc.jpg"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_produces_400() {
        let err = AppError(Error::Validation("bad extension".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn probe_produces_422() {
        let err = AppError(Error::Probe("no metadata".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn internal_produces_500() {
        let err = AppError(Error::Internal("boom".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
