//! Patta OCR - land-record document extraction.
//!
//! Turns a scanned Patta (land title) document into structured data: OCR
//! text, named entities from a multilingual NER model, and six rule-based
//! fields (holder name, village, district, state, claim type and ID).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use patta_ocr::{DocumentProcessor, PattaConfig};
//!
//! # async fn example() -> patta_ocr::Result<()> {
//! let config = PattaConfig::load(None)?;
//! let processor = DocumentProcessor::from_config(&config)?;
//! let response = processor.process_path("patta.jpg".as_ref()).await?;
//! println!("Village: {:?}", response.entity("Village"));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core Module** (`core`): configuration, upload staging, pipeline orchestration
//! - **Plugin System** (`plugins`): `OcrBackend` and `NerBackend` traits
//! - **OCR** (`ocr`): tesseract CLI and HTTP model server backends
//! - **NER** (`ner`): HTTP token-classification backend and entity merging
//! - **Text** (`text`): OCR noise cleaning
//! - **Fields** (`fields`): regex extraction of the Patta fields
//! - **API** (`api`, feature `api`): axum HTTP server

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod fields;
pub mod ner;
pub mod ocr;
pub mod plugins;
pub mod text;
pub mod types;
pub mod utils;

#[cfg(feature = "api")]
pub mod api;

pub use error::{PattaError, Result};
pub use types::ProcessResponse;

pub use core::config::PattaConfig;
pub use core::pipeline::DocumentProcessor;
pub use fields::{PattaFields, extract_patta_fields};
pub use ner::{EntitySpan, MergedEntities, merge_entities};
pub use text::clean_text;
