// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::models::ModelConfig;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub documents: DocumentsConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub ollama: OllamaConfig,
    pub batch: BatchConfig,
    pub benchmark: BenchmarkConfig,
    pub reports: ReportsConfig,
    pub models: Vec<ModelConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentsConfig {
    /// Folder scanned for `.pdf` files.
    pub pdf_dir: PathBuf,
    /// Where the persisted vector index lives.
    pub index_dir: PathBuf,
}

/// Character splitter policy. Sizes are counted in characters.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub separator: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OllamaConfig {
    pub base_url: String,
    pub embedding_model: String,
    pub embedding_batch_size: usize,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    pub temperature: f32,
    pub rag_system_prompt: String,
    pub control_system_prompt: String,
    pub context_instruction: String,
    pub answer_instruction: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchConfig {
    pub questions_file: PathBuf,
    pub expected_questions: usize,
    pub answer_max_chars: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BenchmarkConfig {
    pub question_preview_chars: usize,
    pub answer_preview_chars: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportsConfig {
    pub output_dir: PathBuf,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("RAG_BENCH")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            documents: DocumentsConfig {
                pdf_dir: PathBuf::from("./base_tcc"),
                index_dir: PathBuf::from("./faiss_index"),
            },
            chunking: ChunkingConfig {
                chunk_size: 500,
                chunk_overlap: 100,
                separator: "\n".to_string(),
            },
            retrieval: RetrievalConfig { top_k: 5 },
            ollama: OllamaConfig {
                base_url: "http://localhost:11434".to_string(),
                embedding_model: "all-minilm".to_string(),
                embedding_batch_size: 32,
                timeout_secs: None,
                temperature: 0.3,
                rag_system_prompt: "You are a technical assistant. Answer strictly from the \
                    provided documents, in your own words, clearly and precisely, without \
                    relying on outside knowledge."
                    .to_string(),
                control_system_prompt: "You are a technical assistant. Answer clearly and \
                    objectively using your general knowledge."
                    .to_string(),
                context_instruction: "Based on these excerpts:".to_string(),
                answer_instruction: "Answer the question below in your own words.".to_string(),
            },
            batch: BatchConfig {
                questions_file: PathBuf::from("perguntas.csv"),
                expected_questions: 100,
                answer_max_chars: 2000,
            },
            benchmark: BenchmarkConfig {
                question_preview_chars: 80,
                answer_preview_chars: 500,
            },
            reports: ReportsConfig {
                output_dir: PathBuf::from("."),
            },
            models: vec![
                ModelConfig::rag("mistral", "Mistral (4.4GB) - best quality for complex tasks", 4),
                ModelConfig::rag("llama2", "Llama 2 (3.8GB) - balance of quality and speed", 4),
                ModelConfig::rag("tinyllama", "TinyLlama (637MB) - light and fast", 2),
                ModelConfig::control(
                    "llama2_raw",
                    "llama2",
                    "Llama 2 control (3.8GB) - no documents",
                ),
            ],
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(PipelineError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(PipelineError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }

        if self.retrieval.top_k == 0 {
            return Err(PipelineError::Config(
                "top_k must be greater than 0".to_string(),
            ));
        }

        if self.ollama.embedding_batch_size == 0 {
            return Err(PipelineError::Config(
                "embedding_batch_size must be greater than 0".to_string(),
            ));
        }

        crate::utils::Validator::validate_url(&self.ollama.base_url)
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        if self.models.is_empty() {
            return Err(PipelineError::Config(
                "at least one model must be configured".to_string(),
            ));
        }

        let mut keys = HashSet::new();
        for model in &self.models {
            if model.key.trim().is_empty() || model.model.trim().is_empty() {
                return Err(PipelineError::Config(
                    "model key and name cannot be empty".to_string(),
                ));
            }
            if !keys.insert(model.key.as_str()) {
                return Err(PipelineError::Config(format!(
                    "duplicate model key: {}",
                    model.key
                )));
            }
        }

        Ok(())
    }
}
