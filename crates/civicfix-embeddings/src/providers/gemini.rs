//! Gemini `embedContent` provider.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use civicfix_core::config::EmbeddingConfig;
use civicfix_core::errors::EmbeddingError;
use civicfix_core::traits::IEmbeddingProvider;
use civicfix_upstream::{HttpClient, HttpClientConfig};

pub const EMBEDDING_SERVICE: &str = "embedding";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: String,
    content: Content<'a>,
    output_dimensionality: usize,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

/// Remote provider calling `models/{model}:embedContent`.
pub struct GeminiProvider {
    http: HttpClient,
    model: String,
    api_key: String,
    dimensions: usize,
}

impl GeminiProvider {
    pub fn new(config: &EmbeddingConfig, api_key: String) -> Result<Self, EmbeddingError> {
        let http = HttpClient::new(HttpClientConfig::new(
            EMBEDDING_SERVICE,
            &config.api_base,
            Duration::from_secs(config.timeout_secs),
        ))?;
        Ok(Self {
            http,
            model: config.model.clone(),
            api_key,
            dimensions: config.dimensions,
        })
    }
}

impl IEmbeddingProvider for GeminiProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = EmbedContentRequest {
            model: format!("models/{}", self.model),
            content: Content {
                parts: [Part { text }],
            },
            output_dimensionality: self.dimensions,
        };
        let path = format!("models/{}:embedContent", self.model);
        let response: EmbedContentResponse = self
            .http
            .post_json_with_header(&path, ("x-goog-api-key", self.api_key.as_str()), &body)
            .await?;
        debug!(
            model = %self.model,
            dims = response.embedding.values.len(),
            "remote embedding received"
        );
        Ok(response.embedding.values)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_camel_case_wire_names() {
        let body = EmbedContentRequest {
            model: "models/gemini-embedding-001".into(),
            content: Content {
                parts: [Part { text: "hello" }],
            },
            output_dimensionality: 3072,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["outputDimensionality"], 3072);
        assert_eq!(json["content"]["parts"][0]["text"], "hello");
    }

    #[test]
    fn response_parses_values() {
        let parsed: EmbedContentResponse =
            serde_json::from_str(r#"{"embedding": {"values": [0.1, -0.2]}}"#).unwrap();
        assert_eq!(parsed.embedding.values, vec![0.1, -0.2]);
    }
}
