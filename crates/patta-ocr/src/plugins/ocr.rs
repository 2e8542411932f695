//! OCR backend plugin trait.

use crate::Result;
use crate::ocr::types::{OcrBackendType, RecognizedSpan};
use crate::plugins::Plugin;
use async_trait::async_trait;
use std::path::Path;

/// Trait for OCR backends.
///
/// A backend turns an image on disk into recognized text regions in reading
/// order. The model itself is external: a CLI binary, a model server, or a
/// test double.
///
/// # Example
///
/// ```rust
/// use patta_ocr::plugins::{OcrBackend, Plugin};
/// use patta_ocr::ocr::{OcrBackendType, RecognizedSpan};
/// use patta_ocr::Result;
/// use async_trait::async_trait;
/// use std::path::Path;
///
/// struct FixedOcr;
///
/// impl Plugin for FixedOcr {
///     fn name(&self) -> &str { "fixed-ocr" }
///     fn version(&self) -> String { "1.0.0".to_string() }
///     fn initialize(&self) -> Result<()> { Ok(()) }
///     fn shutdown(&self) -> Result<()> { Ok(()) }
/// }
///
/// #[async_trait]
/// impl OcrBackend for FixedOcr {
///     async fn recognize_file(&self, _path: &Path) -> Result<Vec<RecognizedSpan>> {
///         Ok(vec![RecognizedSpan::new("Village: Rampur")])
///     }
///
///     fn backend_type(&self) -> OcrBackendType {
///         OcrBackendType::Custom
///     }
/// }
/// ```
#[async_trait]
pub trait OcrBackend: Plugin {
    /// Run text recognition on the image at `path`.
    ///
    /// # Errors
    ///
    /// - `PattaError::Ocr` - the engine failed or returned unreadable output
    /// - `PattaError::Io` - the image could not be read
    async fn recognize_file(&self, path: &Path) -> Result<Vec<RecognizedSpan>>;

    /// The kind of engine behind this backend.
    fn backend_type(&self) -> OcrBackendType;
}
