//! Text processing for OCR output.

pub mod clean;

pub use clean::{MAX_NOISE_TOKEN_LEN, clean_text, join_spans};
