//! API error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::PattaError;

use super::types::ErrorResponse;

/// A [`PattaError`] paired with the HTTP status it is reported with.
///
/// Request validation failures map to 400; every pipeline failure (upload
/// staging, OCR, NER, extraction, I/O) maps to 500.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: PattaError,
}

impl ApiError {
    pub fn new(status: StatusCode, error: PattaError) -> Self {
        Self { status, error }
    }

    /// 400 Bad Request.
    pub fn validation(error: PattaError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// 500 Internal Server Error.
    pub fn internal(error: PattaError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn error(&self) -> &PattaError {
        &self.error
    }
}

impl From<PattaError> for ApiError {
    fn from(error: PattaError) -> Self {
        match error {
            PattaError::Validation { .. } => Self::validation(error),
            _ => Self::internal(error),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_type = self.error.kind();
        tracing::error!(
            status = self.status.as_u16(),
            error_type,
            error = %self.error,
            "Request failed"
        );

        let body = ErrorResponse {
            error: self.error.to_string(),
            error_type: error_type.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}
