//! Error types for patta-ocr.
//!
//! Every stage of the document pipeline reports failures through
//! [`PattaError`], so callers (the HTTP layer in particular) can tell an
//! upload problem from an OCR or NER model failure.
//!
//! - `Io` wraps `std::io::Error` unchanged; it comes from `?` on filesystem calls.
//! - `Upload`, `Ocr`, `Ner` and `Extraction` name the pipeline stage that failed.
//!   The built-in field extraction never fails (an unmatched field is `None`),
//!   so `Extraction` is only produced by callers that run their own extraction
//!   step on top of [`crate::DocumentProcessor::process_path`].
//! - `Validation` covers bad requests and bad configuration.
//!
//! # Example
//!
//! ```rust
//! use patta_ocr::{PattaError, Result};
//!
//! fn read_image(path: &str) -> Result<Vec<u8>> {
//!     let bytes = std::fs::read(path)?;
//!     if bytes.is_empty() {
//!         return Err(PattaError::validation(format!("Image is empty: {}", path)));
//!     }
//!     Ok(bytes)
//! }
//! ```
use thiserror::Error;

/// Result type alias using `PattaError`.
pub type Result<T> = std::result::Result<T, PattaError>;

/// Main error type for all patta-ocr operations.
#[derive(Debug, Error)]
pub enum PattaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upload error: {message}")]
    Upload {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("OCR error: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("NER error: {message}")]
    Ner {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Not raised by the built-in pipeline; see the module docs.
    #[error("Extraction error: {message}")]
    Extraction {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("{0}")]
    Other(String),
}

impl PattaError {
    /// Stable name of the error kind, as reported to HTTP clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "IoError",
            Self::Upload { .. } => "UploadError",
            Self::Ocr { .. } => "OcrError",
            Self::Ner { .. } => "NerError",
            Self::Extraction { .. } => "ExtractionError",
            Self::Validation { .. } => "ValidationError",
            Self::Serialization { .. } => "SerializationError",
            Self::MissingDependency(_) => "MissingDependencyError",
            Self::Other(_) => "InternalError",
        }
    }
}

impl From<serde_json::Error> for PattaError {
    fn from(err: serde_json::Error) -> Self {
        PattaError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl PattaError {
    error_constructor!(upload, Upload);
    error_constructor!(ocr, Ocr);
    error_constructor!(ner, Ner);
    error_constructor!(extraction, Extraction);
    error_constructor!(validation, Validation);
    error_constructor!(serialization, Serialization);
}
