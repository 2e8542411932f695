//! Patta (land-record) field extraction.
//!
//! Six fixed labelled fields are pulled out of cleaned OCR text with
//! case-insensitive patterns. Every field is always present in the result;
//! fields whose label does not appear map to `None` (`null` in JSON).

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

pub const HOLDER_NAME: &str = "Patta Holder Name";
pub const VILLAGE: &str = "Village";
pub const DISTRICT: &str = "District";
pub const STATE: &str = "State";
pub const CLAIM_TYPE: &str = "Claim Type";
pub const ID: &str = "ID";

/// Field names in extraction (and response) order.
pub const FIELD_NAMES: [&str; 6] = [HOLDER_NAME, VILLAGE, DISTRICT, STATE, CLAIM_TYPE, ID];

const FIELD_PATTERNS: [(&str, &str); 6] = [
    (
        HOLDER_NAME,
        r"\b(?:Patta Holder Name|Patta Holder|Holder Name)[:\- ]+([A-Za-z\s]{1,50})",
    ),
    (VILLAGE, r"\bVillage[:\- ]+([A-Za-z\s]{1,50})"),
    (DISTRICT, r"\bDistrict[:\- ]+([A-Za-z\s]{1,50})"),
    (STATE, r"\bState[:\- ]+([A-Za-z\s]{1,50})"),
    (CLAIM_TYPE, r"\bClaim Type[:\- ]+([A-Za-z]{1,30})"),
    (ID, r"\bID[:\- ]+(\w{3,20})"),
];

static COMPILED_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    FIELD_PATTERNS
        .iter()
        .map(|(name, pattern)| {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("Patta field regex pattern is valid and should compile");
            (*name, regex)
        })
        .collect()
});

// A free-text capture runs on into the next label ("Rampur District"); cut it there.
static NEXT_LABEL: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"\b(?:patta holder|holder name|village|district|state|claim type|id)\b")
        .case_insensitive(true)
        .build()
        .expect("Field label regex pattern is valid and should compile")
});

/// Extracted Patta fields, keyed by field name in [`FIELD_NAMES`] order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PattaFields(IndexMap<String, Option<String>>);

impl PattaFields {
    /// Value of a field, `None` when absent or unmatched.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|v| v.as_deref())
    }

    /// Iterate over `(name, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Number of fields that matched.
    pub fn matched_count(&self) -> usize {
        self.0.values().filter(|v| v.is_some()).count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for PattaFields {
    type Item = (String, Option<String>);
    type IntoIter = indexmap::map::IntoIter<String, Option<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Extract the six Patta fields from cleaned text.
///
/// # Example
///
/// ```rust
/// use patta_ocr::fields::extract_patta_fields;
///
/// let fields = extract_patta_fields("Village: Rampur District: Nashik");
/// assert_eq!(fields.get("Village"), Some("Rampur"));
/// assert_eq!(fields.get("District"), Some("Nashik"));
/// assert_eq!(fields.get("State"), None);
/// ```
pub fn extract_patta_fields(text: &str) -> PattaFields {
    let fields = COMPILED_PATTERNS
        .iter()
        .map(|(name, regex)| {
            let value = regex
                .captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| normalize_value(m.as_str()));
            (name.to_string(), value)
        })
        .collect();

    PattaFields(fields)
}

fn normalize_value(captured: &str) -> Option<String> {
    let value = match NEXT_LABEL.find(captured) {
        Some(label) => &captured[..label.start()],
        None => captured,
    };
    let value = value.split_whitespace().collect::<Vec<_>>().join(" ");

    if value.is_empty() { None } else { Some(value) }
}
