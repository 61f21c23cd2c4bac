// file: src/llm/embeddings.rs
// description: Ollama embed endpoint integration for chunk and question vectors
// reference: https://github.com/ollama/ollama/blob/main/docs/api.md#generate-embeddings

use crate::config::OllamaConfig;
use crate::error::{PipelineError, Result};
use crate::llm::Embedder;
use crate::llm::client::build_http_client;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

pub struct OllamaEmbeddingClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaEmbeddingClient {
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.embedding_model.clone(),
        })
    }
}

#[async_trait]
impl Embedder for OllamaEmbeddingClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/api/embed", self.base_url);
        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };

        debug!(
            "Requesting {} embeddings from {} with model {}",
            texts.len(),
            url,
            self.model
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                PipelineError::model_unavailable(
                    &self.model,
                    format!("cannot reach Ollama at {}: {}", self.base_url, e),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::model_unavailable(
                &self.model,
                format!("embedding request failed with status {}: {}", status, error_text),
            ));
        }

        let embed_response: EmbedResponse = response.json().await.map_err(|e| {
            PipelineError::model_unavailable(
                &self.model,
                format!("failed to parse embedding response: {}", e),
            )
        })?;

        if embed_response.embeddings.len() != texts.len() {
            return Err(PipelineError::model_unavailable(
                &self.model,
                format!(
                    "expected {} embeddings, received {}",
                    texts.len(),
                    embed_response.embeddings.len()
                ),
            ));
        }

        debug!(
            "Received embeddings of dimension {}",
            embed_response.embeddings.first().map_or(0, Vec::len)
        );
        Ok(embed_response.embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::llm::test_server::{closed_address, serve_once};

    fn client_for(base_url: String) -> OllamaEmbeddingClient {
        let mut config = Config::default_config().ollama;
        config.base_url = base_url;
        OllamaEmbeddingClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_embed_batch() {
        let (url, request) =
            serve_once("200 OK", r#"{"model":"all-minilm","embeddings":[[0.1,0.2],[0.3,0.4]]}"#)
                .await;
        let client = client_for(url);

        let vectors = client
            .embed(&["first".to_string(), "second".to_string()])
            .await
            .unwrap();

        assert_eq!(vectors, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
        let request = request.await.unwrap();
        assert!(request.starts_with("POST /api/embed"));
        assert!(request.contains(r#""input":["first","second"]"#));
    }

    #[tokio::test]
    async fn test_embed_count_mismatch() {
        let (url, _request) = serve_once("200 OK", r#"{"embeddings":[[0.1]]}"#).await;
        let client = client_for(url);

        let result = client.embed(&["a".to_string(), "b".to_string()]).await;
        assert!(matches!(result, Err(PipelineError::ModelUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_embed_unreachable_server() {
        let client = client_for(closed_address().await);
        let result = client.embed_one("question").await;
        assert!(matches!(result, Err(PipelineError::ModelUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_embed_empty_input_skips_request() {
        let client = client_for(closed_address().await);
        assert!(client.embed(&[]).await.unwrap().is_empty());
    }
}
