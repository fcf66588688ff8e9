use crate::error::ProviderError;
use crate::providers::EmbeddingProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_EMBED_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_OLLAMA_EMBED_DIMENSIONS: usize = 768;

/// Embedding client for an Ollama server.
pub struct OllamaEmbedder {
    client: Client,
    embeddings_url: String,
    model: String,
    dimensions: usize,
}

impl OllamaEmbedder {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        dimensions: usize,
    ) -> Result<Self, ProviderError> {
        Url::parse(base_url)?;
        let base = base_url.trim_end_matches('/');

        Ok(Self {
            client: Client::new(),
            embeddings_url: format!("{base}/api/embeddings"),
            model: model.into(),
            dimensions,
        })
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    // Ollama has no native batch endpoint; texts are embedded one request
    // at a time.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for text in texts {
            let request = EmbeddingsRequest {
                model: &self.model,
                prompt: text,
            };

            let response = self
                .client
                .post(&self.embeddings_url)
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::Backend {
                    provider: "ollama".to_string(),
                    details: format!("{status}: {}", body.trim()),
                });
            }

            let payload: EmbeddingsResponse = response.json().await?;
            if payload.embedding.len() != self.dimensions {
                return Err(ProviderError::Backend {
                    provider: "ollama".to_string(),
                    details: format!(
                        "embedding dimension {} does not match configured {}",
                        payload.embedding.len(),
                        self.dimensions
                    ),
                });
            }

            embeddings.push(payload.embedding);
        }

        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_payload_parses() {
        let payload: EmbeddingsResponse =
            serde_json::from_str(r#"{"embedding": [0.1, 0.2, 0.3]}"#).expect("payload parses");
        assert_eq!(payload.embedding.len(), 3);
    }

    #[test]
    fn request_body_matches_wire_format() {
        let request = EmbeddingsRequest {
            model: "nomic-embed-text",
            prompt: "hello",
        };
        let value = serde_json::to_value(&request).expect("request serializes");
        assert_eq!(value["model"], "nomic-embed-text");
        assert_eq!(value["prompt"], "hello");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            OllamaEmbedder::new("::::", DEFAULT_OLLAMA_EMBED_MODEL, 768),
            Err(ProviderError::Url(_))
        ));
    }
}
