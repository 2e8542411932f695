//! NER backend plugin trait.

use crate::Result;
use crate::ner::types::EntitySpan;
use crate::plugins::Plugin;
use async_trait::async_trait;

/// Trait for named-entity-recognition backends.
///
/// Implementations call a token-classification model and return its grouped
/// entity spans unfiltered; confidence filtering and merging happen in
/// [`crate::ner::merge_entities`].
#[async_trait]
pub trait NerBackend: Plugin {
    /// Label entity spans in `text`.
    ///
    /// # Errors
    ///
    /// - `PattaError::Ner` - the model call failed or its response was malformed
    async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>>;
}
