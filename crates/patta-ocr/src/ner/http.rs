//! Token-classification model over HTTP.
//!
//! Speaks the Hugging Face inference protocol: the request body is
//! `{"inputs": text, "parameters": {"aggregation_strategy": ...}}` and the
//! response is a list of entity spans (or a single-element batch of them).

use crate::core::config::NerConfig;
use crate::ner::types::EntitySpan;
use crate::plugins::{NerBackend, Plugin};
use crate::utils::error_body_message;
use crate::{PattaError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// NER backend calling a remote token-classification endpoint.
pub struct HttpNerBackend {
    client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
    aggregation_strategy: String,
}

#[derive(Debug, Serialize)]
struct NerRequest<'a> {
    inputs: &'a str,
    parameters: NerParameters<'a>,
    options: NerOptions,
}

#[derive(Debug, Serialize)]
struct NerParameters<'a> {
    aggregation_strategy: &'a str,
}

#[derive(Debug, Serialize)]
struct NerOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NerResponse {
    Flat(Vec<EntitySpan>),
    Batched(Vec<Vec<EntitySpan>>),
}

impl HttpNerBackend {
    /// # Errors
    ///
    /// Returns `PattaError::Ner` if the HTTP client cannot be built.
    pub fn new(config: &NerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PattaError::ner_with_source("failed to build NER HTTP client", e))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_token: config.api_token.clone(),
            aggregation_strategy: config.aggregation_strategy.clone(),
        })
    }
}

impl Plugin for HttpNerBackend {
    fn name(&self) -> &str {
        "http-ner"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn initialize(&self) -> Result<()> {
        if self.api_token.is_none() {
            tracing::warn!(endpoint = %self.endpoint, "No NER API token configured; requests are unauthenticated");
        }
        tracing::info!(endpoint = %self.endpoint, "HTTP NER backend configured");
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl NerBackend for HttpNerBackend {
    #[tracing::instrument(level = "debug", skip(self, text), fields(chars = text.len()))]
    async fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let request = NerRequest {
            inputs: text,
            parameters: NerParameters {
                aggregation_strategy: &self.aggregation_strategy,
            },
            options: NerOptions { wait_for_model: true },
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PattaError::ner_with_source("NER model request failed", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PattaError::ner_with_source("failed to read NER model response", e))?;

        if !status.is_success() {
            return Err(PattaError::ner(format!(
                "NER model returned {}: {}",
                status,
                error_body_message(&body)
            )));
        }

        let spans = parse_ner_response(&body)?;
        tracing::debug!(spans = spans.len(), "NER finished");
        Ok(spans)
    }
}

pub(crate) fn parse_ner_response(body: &str) -> Result<Vec<EntitySpan>> {
    match serde_json::from_str::<NerResponse>(body) {
        Ok(NerResponse::Flat(spans)) => Ok(spans),
        Ok(NerResponse::Batched(batches)) => Ok(batches.into_iter().flatten().collect()),
        Err(e) => Err(PattaError::ner(format!(
            "unrecognized NER model response ({}): {}",
            e,
            error_body_message(body)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_response() {
        let body = r#"[
            {"entity_group": "PER", "score": 0.998, "word": "Ram Kumar", "start": 19, "end": 28},
            {"entity_group": "LOC", "score": 0.991, "word": "Rampur", "start": 38, "end": 44}
        ]"#;
        let spans = parse_ner_response(body).unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].label(), "PER");
        assert_eq!(spans[1].word, "Rampur");
    }

    #[test]
    fn test_parse_batched_response() {
        let body = r#"[[{"entity_group": "LOC", "score": 0.9, "word": "Nashik"}]]"#;
        let spans = parse_ner_response(body).unwrap();
        assert_eq!(spans, vec![EntitySpan::new("LOC", "Nashik", 0.9)]);
    }

    #[test]
    fn test_parse_empty_response() {
        assert!(parse_ner_response("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_error_body() {
        let err = parse_ner_response(r#"{"error": "Model Davlan/xlm-roberta-large-ner-hrl is currently loading"}"#)
            .unwrap_err();
        assert!(matches!(err, PattaError::Ner { .. }));
        assert!(err.to_string().contains("currently loading"));
    }

    #[test]
    fn test_request_body_shape() {
        let request = NerRequest {
            inputs: "Village: Rampur",
            parameters: NerParameters {
                aggregation_strategy: "simple",
            },
            options: NerOptions { wait_for_model: true },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["inputs"], "Village: Rampur");
        assert_eq!(json["parameters"]["aggregation_strategy"], "simple");
        assert_eq!(json["options"]["wait_for_model"], true);
    }

    #[tokio::test]
    async fn test_empty_text_skips_request() {
        let config = NerConfig {
            endpoint: "http://127.0.0.1:1/ner".to_string(),
            ..Default::default()
        };
        let backend = HttpNerBackend::new(&config).unwrap();
        assert!(backend.recognize("   ").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_ner_error() {
        let config = NerConfig {
            endpoint: "http://127.0.0.1:1/ner".to_string(),
            timeout_secs: 5,
            ..Default::default()
        };
        let backend = HttpNerBackend::new(&config).unwrap();
        let err = backend.recognize("Ram Kumar of Rampur").await.unwrap_err();
        assert!(matches!(err, PattaError::Ner { .. }));
    }
}
