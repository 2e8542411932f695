//! API request handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
};

use crate::{PattaError, ProcessResponse};

use super::{
    error::ApiError,
    types::{ApiState, HealthResponse, InfoResponse},
};

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

/// Document processing endpoint handler.
///
/// POST /ocr/process
///
/// Accepts multipart form data with a single `file` field holding the scanned
/// document image. Other fields are ignored, as are repeated `file` fields
/// after the first.
///
/// # Errors
///
/// - 400 for malformed multipart data, a missing `file` field or an empty upload
/// - 413 when the body exceeds the configured size limits
/// - 500 when any pipeline stage fails
pub async fn process_handler(
    State(state): State<ApiState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let mut multipart =
        multipart.map_err(|rej| ApiError::new(rej.status(), PattaError::validation(rej.body_text())))?;
    let mut upload: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if upload.is_some() || field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;

        upload = Some(UploadedFile {
            file_name,
            content_type,
            data,
        });
    }

    let Some(upload) = upload else {
        return Err(ApiError::validation(PattaError::validation(format!(
            "No file provided; expected multipart field '{}'",
            FILE_FIELD
        ))));
    };

    if upload.data.is_empty() {
        return Err(ApiError::validation(PattaError::validation("Uploaded file is empty")));
    }

    tracing::info!(
        file_name = upload.file_name.as_deref().unwrap_or("<unnamed>"),
        bytes = upload.data.len(),
        "Processing upload"
    );

    let response = state
        .processor
        .process_upload(
            upload.file_name.as_deref(),
            upload.content_type.as_deref(),
            &upload.data,
        )
        .await?;

    Ok(Json(response))
}

fn multipart_error(e: MultipartError) -> ApiError {
    ApiError::new(e.status(), PattaError::validation(e.body_text()))
}

/// Health check endpoint handler.
///
/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Server info endpoint handler.
///
/// GET /info
pub async fn info_handler(State(state): State<ApiState>) -> Json<InfoResponse> {
    let processor = &state.processor;
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr_backend: processor.ocr_backend().name().to_string(),
        ner_backend: processor.ner_backend().name().to_string(),
        min_score: processor.min_score(),
    })
}
