//! OCR output types.

use serde::{Deserialize, Serialize};

/// OCR backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrBackendType {
    /// `tesseract` command-line binary
    Tesseract,
    /// Remote OCR model server (EasyOCR and compatible)
    Http,
    /// Custom/third-party OCR backend
    Custom,
}

impl std::fmt::Display for OcrBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tesseract => write!(f, "tesseract"),
            Self::Http => write!(f, "http"),
            Self::Custom => write!(f, "custom"),
        }
    }
}

/// One recognized text region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedSpan {
    /// Recognized text
    pub text: String,

    /// Engine confidence in `[0, 1]`, when the engine reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl RecognizedSpan {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence: Some(confidence),
        }
    }
}
