//! Shared helpers for the HTTP model backends.

use serde::Deserialize;

/// Longest slice of a non-JSON error body carried into an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Pull `{"error": "..."}` out of a model server error body, falling back to
/// the (truncated) raw text.
pub fn error_body_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }

    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_message_json() {
        assert_eq!(
            error_body_message(r#"{"error": "Model is currently loading"}"#),
            "Model is currently loading"
        );
    }

    #[test]
    fn test_error_body_message_plain_text() {
        assert_eq!(error_body_message("  Bad Gateway \n"), "Bad Gateway");
        assert_eq!(error_body_message(&"x".repeat(500)).len(), MAX_ERROR_BODY_CHARS);
    }
}
