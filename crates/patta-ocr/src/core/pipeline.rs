//! Document processing pipeline orchestration.
//!
//! One request moves through these stages in order:
//!
//! 1. stage the upload on disk ([`ScopedUpload`])
//! 2. OCR the staged image
//! 3. clean the recognized text
//! 4. run NER over the cleaned text
//! 5. filter and merge entities per label
//! 6. extract the six Patta fields
//! 7. assemble the [`ProcessResponse`]
//! 8. delete the staged file (on every path)
//!
//! A failure in stages 1-4 aborts the request, except that with
//! `pipeline.partial_results` enabled an NER failure is reported as a warning
//! and the OCR text and Patta fields are still returned.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::Result;
use crate::core::config::PattaConfig;
use crate::core::upload::ScopedUpload;
use crate::fields::extract_patta_fields;
use crate::ner::{MergedEntities, build_ner_backend, merge_entities};
use crate::ocr::build_ocr_backend;
use crate::plugins::{NerBackend, OcrBackend, Plugin};
use crate::text::{clean_text, join_spans};
use crate::types::ProcessResponse;

/// Runs the OCR → NER → field extraction pipeline with injected backends.
///
/// Backends are shared read-only between requests; the processor itself
/// holds no per-request state.
///
/// # Example
///
/// ```rust,no_run
/// use patta_ocr::{DocumentProcessor, PattaConfig};
///
/// # async fn example() -> patta_ocr::Result<()> {
/// let processor = DocumentProcessor::from_config(&PattaConfig::default())?;
/// let bytes = std::fs::read("patta.png")?;
/// let response = processor.process_upload(Some("patta.png"), Some("image/png"), &bytes).await?;
/// println!("{:?}", response.entity("Village"));
/// # Ok(())
/// # }
/// ```
pub struct DocumentProcessor {
    ocr: Arc<dyn OcrBackend>,
    ner: Arc<dyn NerBackend>,
    upload_dir: PathBuf,
    min_score: f64,
    partial_results: bool,
}

impl DocumentProcessor {
    /// Create a processor from already-built backends.
    pub fn new(ocr: Arc<dyn OcrBackend>, ner: Arc<dyn NerBackend>, config: &PattaConfig) -> Self {
        Self {
            ocr,
            ner,
            upload_dir: config.upload.resolved_dir(),
            min_score: config.ner.min_score,
            partial_results: config.pipeline.partial_results,
        }
    }

    /// Build and initialize the configured backends, then create a processor.
    ///
    /// # Errors
    ///
    /// Returns backend construction/initialization errors.
    pub fn from_config(config: &PattaConfig) -> Result<Self> {
        let ocr = build_ocr_backend(&config.ocr)?;
        let ner = build_ner_backend(&config.ner)?;
        Ok(Self::new(ocr, ner, config))
    }

    pub fn ocr_backend(&self) -> &dyn OcrBackend {
        self.ocr.as_ref()
    }

    pub fn ner_backend(&self) -> &dyn NerBackend {
        self.ner.as_ref()
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    pub fn partial_results(&self) -> bool {
        self.partial_results
    }

    /// Shut down both backends. Failures are logged, not returned.
    pub fn shutdown(&self) {
        let backends: [&dyn Plugin; 2] = [self.ocr.as_ref(), self.ner.as_ref()];
        for backend in backends {
            if let Err(e) = backend.shutdown() {
                tracing::warn!(backend = backend.name(), error = %e, "Backend shutdown failed");
            }
        }
    }

    /// Process an uploaded document.
    ///
    /// The bytes are staged in the upload directory for the OCR engine and
    /// removed before this returns, whether processing succeeded or not.
    #[tracing::instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    pub async fn process_upload(
        &self,
        file_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<ProcessResponse> {
        let upload = ScopedUpload::create(&self.upload_dir, file_name, content_type, bytes).await?;
        let result = self.process_path(upload.path()).await;
        upload.close();
        result
    }

    /// Process a document that is already on disk. The file is left in place.
    #[tracing::instrument(skip(self))]
    pub async fn process_path(&self, path: &Path) -> Result<ProcessResponse> {
        let started = Instant::now();

        let spans = self.ocr.recognize_file(path).await?;
        let ocr_text = clean_text(&join_spans(spans.iter().map(|span| span.text.as_str())));
        tracing::debug!(
            spans = spans.len(),
            chars = ocr_text.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "OCR stage complete"
        );

        let mut warnings = Vec::new();
        let entities = self.recognize_entities(&ocr_text, &mut warnings).await?;

        let fields = extract_patta_fields(&ocr_text);
        tracing::debug!(
            labels = entities.len(),
            fields_matched = fields.matched_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Extraction complete"
        );

        Ok(ProcessResponse::assemble(ocr_text, entities, fields, warnings))
    }

    async fn recognize_entities(&self, text: &str, warnings: &mut Vec<String>) -> Result<MergedEntities> {
        if text.is_empty() {
            return Ok(MergedEntities::default());
        }

        match self.ner.recognize(text).await {
            Ok(spans) => Ok(merge_entities(&spans, self.min_score)),
            Err(e) if self.partial_results => {
                tracing::warn!(error = %e, "NER failed, returning partial results");
                warnings.push(e.to_string());
                Ok(MergedEntities::default())
            }
            Err(e) => Err(e),
        }
    }
}
