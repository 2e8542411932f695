//! NER wire and result types.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One labelled span as returned by a token-classification model.
///
/// Aggregated responses carry `entity_group`; raw per-token responses carry
/// `entity` (usually with a `B-`/`I-` prefix). Both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpan {
    #[serde(alias = "entity")]
    pub entity_group: String,

    pub word: String,

    pub score: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl EntitySpan {
    pub fn new(label: impl Into<String>, word: impl Into<String>, score: f64) -> Self {
        Self {
            entity_group: label.into(),
            word: word.into(),
            score,
            start: None,
            end: None,
        }
    }

    /// Entity label without an IOB `B-`/`I-` prefix.
    pub fn label(&self) -> &str {
        let label = self.entity_group.as_str();
        label
            .strip_prefix("B-")
            .or_else(|| label.strip_prefix("I-"))
            .unwrap_or(label)
    }
}

/// Entities merged per label: each label maps to a one-element list holding
/// the joined, deduplicated tokens. Labels keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergedEntities(IndexMap<String, Vec<String>>);

impl MergedEntities {
    pub fn get(&self, label: &str) -> Option<&[String]> {
        self.0.get(label).map(Vec::as_slice)
    }

    /// The joined value for `label`.
    pub fn joined(&self, label: &str) -> Option<&str> {
        self.0.get(label).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for MergedEntities {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for MergedEntities {
    type Item = (String, Vec<String>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_aggregated_span() {
        let span: EntitySpan = serde_json::from_str(
            r#"{"entity_group": "LOC", "score": 0.99, "word": "Nashik", "start": 24, "end": 30}"#,
        )
        .unwrap();
        assert_eq!(span.label(), "LOC");
        assert_eq!(span.word, "Nashik");
        assert_eq!(span.start, Some(24));
    }

    #[test]
    fn test_deserialize_raw_token_span() {
        let span: EntitySpan =
            serde_json::from_str(r#"{"entity": "B-PER", "score": 0.97, "word": "ra", "index": 3}"#).unwrap();
        assert_eq!(span.entity_group, "B-PER");
        assert_eq!(span.label(), "PER");
        assert_eq!(span.end, None);
    }

    #[test]
    fn test_merged_entities_accessors() {
        let merged: MergedEntities = vec![("PER".to_string(), vec!["Ram Kumar".to_string()])]
            .into_iter()
            .collect();
        assert_eq!(merged.joined("PER"), Some("Ram Kumar"));
        assert_eq!(merged.get("PER").map(<[String]>::len), Some(1));
        assert_eq!(merged.joined("LOC"), None);
        assert_eq!(merged.labels().collect::<Vec<_>>(), vec!["PER"]);
        assert_eq!(serde_json::to_string(&merged).unwrap(), r#"{"PER":["Ram Kumar"]}"#);
    }
}
