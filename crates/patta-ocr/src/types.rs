//! Public response types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::fields::PattaFields;
use crate::ner::MergedEntities;

/// Result of processing one document.
///
/// `entities` holds every NER label (joined string) followed by the six Patta
/// fields (`null` when not found). A Patta field replaces an NER label with
/// the same name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// Cleaned OCR text
    pub ocr_text: String,

    /// NER labels and Patta fields
    pub entities: IndexMap<String, Option<String>>,

    /// Stages that degraded without failing the request
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ProcessResponse {
    /// Combine NER output and Patta fields, Patta fields taking precedence.
    pub fn assemble(ocr_text: String, entities: MergedEntities, fields: PattaFields, warnings: Vec<String>) -> Self {
        let mut merged: IndexMap<String, Option<String>> = entities
            .into_iter()
            .map(|(label, values)| (label, values.into_iter().next()))
            .collect();

        for (name, value) in fields {
            if let Some(previous) = merged.get(&name) {
                tracing::debug!(
                    field = %name,
                    ner_value = ?previous,
                    field_value = ?value,
                    "Patta field overrides NER label of the same name"
                );
            }
            merged.insert(name, value);
        }

        Self {
            ocr_text,
            entities: merged,
            warnings,
        }
    }

    /// Value for an entity label or Patta field.
    pub fn entity(&self, key: &str) -> Option<&str> {
        self.entities.get(key).and_then(|v| v.as_deref())
    }
}
