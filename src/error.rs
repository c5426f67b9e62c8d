//! HTTP error mapping.
//!
//! ERROR HANDLING
//! ==============
//! Services return typed errors that implement [`ErrorCode`]. Route handlers
//! convert them into [`ApiError`], which renders a status code plus a JSON
//! `{code, message}` body. Database failures are logged here and surface to
//! the caller with a generic message.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use blocks::rest::ErrorBody;

use crate::services::store::StoreError;

/// Stable, grep-able code for an error, independent of its display text.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// Error response of every failing endpoint.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = store_error_to_status(&err);
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %err, code = err.error_code(), retryable = err.retryable(), "store failure");
            "internal error".to_owned()
        } else {
            err.to_string()
        };
        Self { status, code: err.error_code(), message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { code: self.code.to_owned(), message: self.message };
        (self.status, Json(body)).into_response()
    }
}

pub(crate) fn store_error_to_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::PageNotFound(_) | StoreError::ComponentNotFound(_) => StatusCode::NOT_FOUND,
        StoreError::PageExists(_) => StatusCode::CONFLICT,
        StoreError::InvalidPageKey(_)
        | StoreError::EmptyType
        | StoreError::InvalidData
        | StoreError::InvalidReorder(_) => StatusCode::BAD_REQUEST,
        StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
