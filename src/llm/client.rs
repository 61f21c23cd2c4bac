// file: src/llm/client.rs
// description: Ollama generate and tags endpoints over reqwest
// reference: https://github.com/ollama/ollama/blob/main/docs/api.md

use crate::config::OllamaConfig;
use crate::error::{PipelineError, Result};
use crate::llm::{GenerationRequest, Generator};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub(crate) fn build_http_client(timeout_secs: Option<u64>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| PipelineError::Config(format!("Failed to build HTTP client: {}", e)))
}

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Default, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_thread: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    eval_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(config: &OllamaConfig) -> Result<Self> {
        info!("Using Ollama server at {}", config.base_url);
        Ok(Self {
            client: build_http_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn unreachable(&self, model: &str, err: reqwest::Error) -> PipelineError {
        PipelineError::model_unavailable(
            model,
            format!(
                "cannot reach Ollama at {} ({}); is 'ollama serve' running?",
                self.base_url, err
            ),
        )
    }
}

#[async_trait]
impl Generator for OllamaClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateBody {
            model: &request.model,
            prompt: &request.prompt,
            system: request.system.as_deref(),
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
                num_thread: request.num_thread,
            },
        };

        debug!(
            "Sending {} char prompt to model {}",
            request.prompt.chars().count(),
            request.model
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.unreachable(&request.model, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PipelineError::model_unavailable(
                &request.model,
                format!("model not installed; run: ollama pull {}", request.model),
            ));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(PipelineError::model_unavailable(
                &request.model,
                format!("generation failed with status {}: {}", status, error_text),
            ));
        }

        let generated: GenerateResponse = response.json().await.map_err(|e| {
            PipelineError::model_unavailable(
                &request.model,
                format!("failed to parse generation response: {}", e),
            )
        })?;

        debug!(
            "Model {} produced {} tokens",
            request.model,
            generated.eval_count.unwrap_or(0)
        );
        Ok(generated.response)
    }

    async fn installed_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.unreachable("*", e))?;

        if !response.status().is_success() {
            return Err(PipelineError::model_unavailable(
                "*",
                format!("listing models failed with status {}", response.status()),
            ));
        }

        let tags: TagsResponse = response.json().await.map_err(|e| {
            PipelineError::model_unavailable("*", format!("failed to parse model list: {}", e))
        })?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}
