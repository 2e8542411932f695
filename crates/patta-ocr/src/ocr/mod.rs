//! OCR (Optical Character Recognition) backends.
//!
//! Recognition itself is delegated to an external engine:
//!
//! - **tesseract**: the local `tesseract` binary, one subprocess per image
//! - **http**: a remote OCR model server (EasyOCR-compatible responses)
//!
//! [`build_ocr_backend`] constructs and initializes the configured backend
//! once at startup; the returned handle is shared by all requests.
pub mod http;
pub mod tesseract;
pub mod types;

use std::sync::Arc;

use crate::Result;
use crate::core::config::{OcrBackendKind, OcrConfig};
use crate::plugins::OcrBackend;

pub use http::HttpOcrBackend;
pub use tesseract::TesseractCliBackend;
pub use types::{OcrBackendType, RecognizedSpan};

/// Build and initialize the OCR backend selected by `config.backend`.
///
/// # Errors
///
/// Returns the backend's construction or initialization error (for example
/// `PattaError::MissingDependency` when the tesseract binary is absent).
pub fn build_ocr_backend(config: &OcrConfig) -> Result<Arc<dyn OcrBackend>> {
    let backend: Arc<dyn OcrBackend> = match config.backend {
        OcrBackendKind::Tesseract => Arc::new(TesseractCliBackend::new(config)),
        OcrBackendKind::Http => Arc::new(HttpOcrBackend::new(config)?),
    };

    backend.initialize()?;
    Ok(backend)
}
