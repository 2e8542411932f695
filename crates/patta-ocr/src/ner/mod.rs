//! Named-entity recognition.
//!
//! The model runs behind a [`crate::plugins::NerBackend`]; this module holds
//! the HTTP backend, the wire types and the merger that filters and joins
//! model spans per label.
pub mod http;
pub mod merge;
pub mod types;

use std::sync::Arc;

use crate::Result;
use crate::core::config::NerConfig;
use crate::plugins::NerBackend;

pub use http::HttpNerBackend;
pub use merge::merge_entities;
pub use types::{EntitySpan, MergedEntities};

/// Build and initialize the NER backend described by `config`.
pub fn build_ner_backend(config: &NerConfig) -> Result<Arc<dyn NerBackend>> {
    let backend: Arc<dyn NerBackend> = Arc::new(HttpNerBackend::new(config)?);
    backend.initialize()?;
    Ok(backend)
}
