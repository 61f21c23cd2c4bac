// file: src/llm/mod.rs
// description: local inference server access behind embedder and generator traits
// reference: https://github.com/ollama/ollama/blob/main/docs/api.md

pub mod client;
pub mod embeddings;
pub mod prompt;

pub use client::OllamaClient;
pub use embeddings::OllamaEmbeddingClient;
pub use prompt::PromptBuilder;

use crate::error::Result;
use async_trait::async_trait;

/// Turns text into fixed-length vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn model_name(&self) -> &str;

    /// One vector per input, in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| {
            crate::error::PipelineError::model_unavailable(
                self.model_name(),
                "no embedding returned",
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub system: Option<String>,
    pub temperature: Option<f32>,
    pub num_thread: Option<u32>,
}

/// Synchronous (non-streaming) text completion.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Names of the models installed on the server, e.g. `llama2:latest`.
    async fn installed_models(&self) -> Result<Vec<String>>;
}

/// `llama2` matches an installed `llama2:latest`; an explicit tag must match exactly.
pub fn is_installed(installed: &[String], model: &str) -> bool {
    installed.iter().any(|name| {
        name == model
            || (!model.contains(':')
                && name
                    .split_once(':')
                    .is_some_and(|(base, _)| base == model))
    })
}
