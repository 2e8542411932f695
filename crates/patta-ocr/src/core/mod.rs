//! Core orchestration module.
//!
//! - **Configuration** ([`config`]): file discovery, env overrides, validation
//! - **Uploads** ([`upload`]): request-scoped staging of uploaded bytes
//! - **Pipeline** ([`pipeline`]): OCR → cleaning → NER → field extraction
//!
//! # Example
//!
//! ```rust,no_run
//! use patta_ocr::core::config::PattaConfig;
//! use patta_ocr::core::pipeline::DocumentProcessor;
//!
//! # async fn example() -> patta_ocr::Result<()> {
//! let config = PattaConfig::load(None)?;
//! let processor = DocumentProcessor::from_config(&config)?;
//! let response = processor.process_path("patta.jpg".as_ref()).await?;
//! println!("{}", response.ocr_text);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod pipeline;
pub mod upload;

pub use config::{NerConfig, OcrBackendKind, OcrConfig, PattaConfig, PipelineConfig, UploadConfig};
pub use pipeline::DocumentProcessor;
pub use upload::ScopedUpload;
