//! Backend plugin traits.
//!
//! - [`Plugin`] - Base trait that all backends implement
//! - [`OcrBackend`] - Image to text regions
//! - [`NerBackend`] - Text to labelled entity spans
//!
//! Backends are stored in `Arc<dyn Trait>` and injected into
//! [`crate::DocumentProcessor`], so tests can swap in doubles.

mod ner;
mod ocr;
mod traits;

pub use ner::NerBackend;
pub use ocr::OcrBackend;
pub use traits::Plugin;
