//! API request and response types.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::DocumentProcessor;

/// Default request body limit in MB.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 25;

/// API server size limit configuration.
///
/// `max_request_body_bytes` is enforced by `RequestBodyLimitLayer` (413 before
/// the handler runs when `Content-Length` is too large) and
/// `max_multipart_field_bytes` by axum's `DefaultBodyLimit` while the upload
/// is streamed.
///
/// # Examples
///
/// ```
/// use patta_ocr::api::ApiSizeLimits;
///
/// let limits = ApiSizeLimits::from_mb(10, 10);
/// assert_eq!(limits.max_request_body_bytes, 10 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiSizeLimits {
    /// Maximum size of the entire request body in bytes.
    pub max_request_body_bytes: usize,

    /// Maximum size of a single multipart field in bytes.
    pub max_multipart_field_bytes: usize,
}

impl Default for ApiSizeLimits {
    fn default() -> Self {
        Self::from_mb(DEFAULT_MAX_UPLOAD_MB, DEFAULT_MAX_UPLOAD_MB)
    }
}

impl ApiSizeLimits {
    pub fn new(max_request_body_bytes: usize, max_multipart_field_bytes: usize) -> Self {
        Self {
            max_request_body_bytes,
            max_multipart_field_bytes,
        }
    }

    /// Create size limits from MB values. Values too large for `usize`
    /// saturate at `usize::MAX`.
    pub fn from_mb(max_request_body_mb: usize, max_multipart_field_mb: usize) -> Self {
        Self {
            max_request_body_bytes: mb_to_bytes(max_request_body_mb),
            max_multipart_field_bytes: mb_to_bytes(max_multipart_field_mb),
        }
    }
}

fn mb_to_bytes(mb: usize) -> usize {
    mb.saturating_mul(1024 * 1024)
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// API version
    pub version: String,
}

/// Server information response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    /// API version
    pub version: String,
    /// Name of the OCR backend in use
    pub ocr_backend: String,
    /// Name of the NER backend in use
    pub ner_backend: String,
    /// Minimum NER score kept when merging entities
    pub min_score: f64,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
    /// Error kind name (`OcrError`, `NerError`, ...)
    pub error_type: String,
}

/// API server state.
///
/// The processor and its backends are built once at startup and shared by
/// every request.
#[derive(Clone)]
pub struct ApiState {
    pub processor: Arc<DocumentProcessor>,
}
