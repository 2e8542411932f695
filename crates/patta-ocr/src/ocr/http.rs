//! Remote OCR model server backend.
//!
//! The image bytes are POSTed to a model server (for example an EasyOCR
//! sidecar). Two response shapes are accepted, optionally wrapped in
//! `{"results": [...]}`:
//!
//! - objects: `[{"text": "Village: Rampur", "confidence": 0.93}, ...]`
//! - EasyOCR triples: `[[[[x, y], ...], "Village: Rampur", 0.93], ...]`

use crate::core::config::OcrConfig;
use crate::ocr::types::{OcrBackendType, RecognizedSpan};
use crate::plugins::{OcrBackend, Plugin};
use crate::utils::error_body_message;
use crate::{PattaError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// OCR backend calling a model server over HTTP.
pub struct HttpOcrBackend {
    client: reqwest::Client,
    endpoint: String,
    language: String,
}

impl HttpOcrBackend {
    /// # Errors
    ///
    /// Returns `PattaError::Validation` if no endpoint is configured, or
    /// `PattaError::Ocr` if the HTTP client cannot be built.
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .clone()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| PattaError::validation("ocr.endpoint is required for the http OCR backend"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PattaError::ocr_with_source("failed to build OCR HTTP client", e))?;

        Ok(Self {
            client,
            endpoint,
            language: config.language.clone(),
        })
    }
}

impl Plugin for HttpOcrBackend {
    fn name(&self) -> &str {
        "http-ocr"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn initialize(&self) -> Result<()> {
        tracing::info!(endpoint = %self.endpoint, "HTTP OCR backend configured");
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl OcrBackend for HttpOcrBackend {
    #[tracing::instrument(level = "debug", skip(self), fields(endpoint = %self.endpoint))]
    async fn recognize_file(&self, path: &Path) -> Result<Vec<RecognizedSpan>> {
        let bytes = tokio::fs::read(path).await?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("lang", self.language.as_str())])
            .header(reqwest::header::CONTENT_TYPE, mime.essence_str())
            .body(bytes)
            .send()
            .await
            .map_err(|e| PattaError::ocr_with_source("OCR model server request failed", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PattaError::ocr_with_source("failed to read OCR model server response", e))?;

        if !status.is_success() {
            return Err(PattaError::ocr(format!(
                "OCR model server returned {}: {}",
                status,
                error_body_message(&body)
            )));
        }

        parse_ocr_response(&body)
    }

    fn backend_type(&self) -> OcrBackendType {
        OcrBackendType::Http
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireRegion {
    Object {
        text: String,
        #[serde(default, alias = "score")]
        confidence: Option<f64>,
    },
    Triple(serde_json::Value, String, f64),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireResponse {
    List(Vec<WireRegion>),
    Wrapped { results: Vec<WireRegion> },
}

pub(crate) fn parse_ocr_response(body: &str) -> Result<Vec<RecognizedSpan>> {
    let response: WireResponse = serde_json::from_str(body)
        .map_err(|e| PattaError::ocr_with_source("unrecognized OCR model server response", e))?;

    let regions = match response {
        WireResponse::List(regions) | WireResponse::Wrapped { results: regions } => regions,
    };

    Ok(regions
        .into_iter()
        .map(|region| match region {
            WireRegion::Object { text, confidence } => RecognizedSpan { text, confidence },
            WireRegion::Triple(_bbox, text, confidence) => RecognizedSpan::with_confidence(text, confidence),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_regions() {
        let spans =
            parse_ocr_response(r#"[{"text": "Village: Rampur", "confidence": 0.93}, {"text": "Nashik"}]"#).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0], RecognizedSpan::with_confidence("Village: Rampur", 0.93));
        assert_eq!(spans[1], RecognizedSpan::new("Nashik"));
    }

    #[test]
    fn test_parse_easyocr_triples() {
        let body = r#"[[[[0, 0], [120, 0], [120, 20], [0, 20]], "Village: Rampur", 0.88]]"#;
        let spans = parse_ocr_response(body).unwrap();
        assert_eq!(spans, vec![RecognizedSpan::with_confidence("Village: Rampur", 0.88)]);
    }

    #[test]
    fn test_parse_wrapped_results() {
        let spans = parse_ocr_response(r#"{"results": [{"text": "State: Kerala", "score": 0.7}]}"#).unwrap();
        assert_eq!(spans, vec![RecognizedSpan::with_confidence("State: Kerala", 0.7)]);
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(parse_ocr_response("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_garbage_is_ocr_error() {
        let err = parse_ocr_response(r#"{"unexpected": true}"#).unwrap_err();
        assert!(matches!(err, PattaError::Ocr { .. }));
    }

    #[test]
    fn test_new_requires_endpoint() {
        let err = HttpOcrBackend::new(&OcrConfig::default()).err().unwrap();
        assert!(matches!(err, PattaError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_ocr_error() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("scan.png");
        std::fs::write(&image, b"\x89PNG\r\n").unwrap();

        let config = OcrConfig {
            endpoint: Some("http://127.0.0.1:1/readtext".to_string()),
            timeout_secs: 5,
            ..Default::default()
        };
        let backend = HttpOcrBackend::new(&config).unwrap();
        let err = backend.recognize_file(&image).await.unwrap_err();
        assert!(matches!(err, PattaError::Ocr { .. }));
    }
}
