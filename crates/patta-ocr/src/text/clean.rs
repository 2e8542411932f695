//! OCR text cleanup.
//!
//! OCR engines emit stray glyphs, broken punctuation and one- or two-letter
//! fragments. [`clean_text`] reduces that output to a single line that the NER
//! model and the field patterns can work with.

use once_cell::sync::Lazy;
use regex::Regex;

static DISALLOWED_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^A-Za-z0-9\s.,:/\-]").expect("Disallowed chars regex pattern is valid and should compile")
});

/// Tokens at or below this length are treated as OCR noise.
pub const MAX_NOISE_TOKEN_LEN: usize = 2;

/// Normalize raw OCR output.
///
/// Characters other than ASCII letters, digits, whitespace and `. , : / -`
/// become spaces, whitespace runs collapse to a single space, and tokens of
/// length <= 2 are dropped.
///
/// # Example
///
/// ```rust
/// use patta_ocr::text::clean_text;
///
/// assert_eq!(clean_text("Village:  Rampur | a  Dist"), "Village: Rampur Dist");
/// ```
pub fn clean_text(raw: &str) -> String {
    let replaced = DISALLOWED_CHARS.replace_all(raw, " ");

    replaced
        .split_whitespace()
        .filter(|token| token.chars().count() > MAX_NOISE_TOKEN_LEN)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join recognized OCR fragments into one raw string, in reading order.
pub fn join_spans<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    fragments
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
