//! Confidence filtering and per-label merging of NER spans.

use indexmap::{IndexMap, IndexSet};

use super::types::{EntitySpan, MergedEntities};

/// Merge entity spans into one joined string per label.
///
/// Spans scoring below `min_score` are dropped. Surviving words have
/// sub-word markers removed and are title-cased, then each label's words are
/// deduplicated (first occurrence wins) and joined with single spaces.
///
/// # Example
///
/// ```rust
/// use patta_ocr::ner::{EntitySpan, merge_entities};
///
/// let merged = merge_entities(
///     &[EntitySpan::new("PER", "ra##m", 0.9), EntitySpan::new("PER", "ram", 0.5)],
///     0.85,
/// );
/// assert_eq!(merged.get("PER"), Some(&["Ram".to_string()][..]));
/// ```
pub fn merge_entities(entities: &[EntitySpan], min_score: f64) -> MergedEntities {
    let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();

    for entity in entities {
        if entity.score.is_nan() || entity.score < min_score {
            continue;
        }

        let word = normalize_word(&entity.word);
        if word.is_empty() {
            continue;
        }

        grouped.entry(entity.label().to_string()).or_default().push(word);
    }

    grouped
        .into_iter()
        .map(|(label, words)| {
            let unique: IndexSet<String> = words.into_iter().collect();
            let joined = unique.into_iter().collect::<Vec<_>>().join(" ");
            (label, vec![joined])
        })
        .collect()
}

/// Strip WordPiece `##` and SentencePiece `▁` markers, then title-case.
pub(crate) fn normalize_word(word: &str) -> String {
    let stripped = word.replace("##", "").replace('\u{2581}', " ");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    title_case(&collapsed)
}

/// Upper-case the first cased letter of every run of cased letters and
/// lower-case the rest (`"o'NEIL"` -> `"O'Neil"`).
pub(crate) fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous_cased = false;

    for c in s.chars() {
        let cased = c.is_lowercase() || c.is_uppercase();
        if cased {
            if previous_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
        } else {
            out.push(c);
        }
        previous_cased = cased;
    }

    out
}
