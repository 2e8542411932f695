//! Stub OCR/NER backends shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use patta_ocr::ocr::{OcrBackendType, RecognizedSpan};
use patta_ocr::plugins::{NerBackend, OcrBackend, Plugin};
use patta_ocr::{DocumentProcessor, EntitySpan, PattaConfig, PattaError, Result};

/// OCR stub returning fixed lines and recording every path it was given.
pub struct StubOcr {
    lines: Vec<String>,
    error: Option<String>,
    pub seen: Mutex<Vec<PathBuf>>,
}

impl StubOcr {
    pub fn lines(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            error: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::lines(&[])
        }
    }

    pub fn seen_paths(&self) -> Vec<PathBuf> {
        self.seen.lock().unwrap().clone()
    }
}

impl Plugin for StubOcr {
    fn name(&self) -> &str {
        "stub-ocr"
    }
    fn version(&self) -> String {
        "1.0.0".to_string()
    }
    fn initialize(&self) -> Result<()> {
        Ok(())
    }
    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl OcrBackend for StubOcr {
    async fn recognize_file(&self, path: &Path) -> Result<Vec<RecognizedSpan>> {
        assert!(path.is_file(), "upload must exist while OCR runs");
        self.seen.lock().unwrap().push(path.to_path_buf());
        tokio::task::yield_now().await;

        if let Some(message) = &self.error {
            return Err(PattaError::ocr(message.clone()));
        }
        Ok(self.lines.iter().map(RecognizedSpan::new).collect())
    }

    fn backend_type(&self) -> OcrBackendType {
        OcrBackendType::Custom
    }
}

/// NER stub returning fixed spans.
pub struct StubNer {
    spans: Vec<EntitySpan>,
    error: Option<String>,
    pub inputs: Mutex<Vec<String>>,
}

impl StubNer {
    pub fn spans(spans: Vec<EntitySpan>) -> Self {
        Self {
            spans,
            error: None,
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::spans(Vec::new())
        }
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

impl Plugin for StubNer {
    fn name(&self) -> &str {
        "stub-ner"
    }
    fn version(&self) -> String {
        "1.0.0".to_string()
    }
    fn initialize(&self) -> Result<()> {
        Ok(())
    }
    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl NerBackend for StubNer {
    async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>> {
        self.inputs.lock().unwrap().push(text.to_string());
        if let Some(message) = &self.error {
            return Err(PattaError::ner(message.clone()));
        }
        Ok(self.spans.clone())
    }
}

/// Config staging uploads in `dir`.
pub fn config_in(dir: &Path) -> PattaConfig {
    let mut config = PattaConfig::default();
    config.upload.dir = Some(dir.to_path_buf());
    config
}

pub fn processor(ocr: Arc<StubOcr>, ner: Arc<StubNer>, config: &PattaConfig) -> Arc<DocumentProcessor> {
    Arc::new(DocumentProcessor::new(ocr, ner, config))
}

/// Files left in the upload directory.
pub fn remaining_uploads(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}
