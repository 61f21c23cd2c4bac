// file: src/models/model_config.rs
// description: local llm selection and generation parameters
// reference: internal data structures

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Menu key, unique across the configured models (e.g. `llama2_raw`).
    pub key: String,
    /// Model name as known to the Ollama server.
    pub model: String,
    #[serde(default)]
    pub description: String,
    /// Control models answer from general knowledge without retrieval.
    #[serde(default = "default_use_documents")]
    pub use_documents: bool,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub num_thread: Option<u32>,
}

fn default_use_documents() -> bool {
    true
}

impl ModelConfig {
    pub fn rag(name: &str, description: &str, num_thread: u32) -> Self {
        Self {
            key: name.to_string(),
            model: name.to_string(),
            description: description.to_string(),
            use_documents: true,
            temperature: None,
            num_thread: Some(num_thread),
        }
    }

    pub fn control(key: &str, model: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            model: model.to_string(),
            description: description.to_string(),
            use_documents: false,
            temperature: None,
            num_thread: None,
        }
    }

    /// Label used in reports and comparison tables.
    pub fn display_name(&self) -> String {
        if self.use_documents {
            format!("{} (RAG)", self.key)
        } else {
            format!("{} (CONTROL)", self.model)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(ModelConfig::rag("mistral", "", 4).display_name(), "mistral (RAG)");
        assert_eq!(
            ModelConfig::control("llama2_raw", "llama2", "").display_name(),
            "llama2 (CONTROL)"
        );
    }

    #[test]
    fn test_deserialize_defaults() {
        let model: ModelConfig =
            serde_json::from_str(r#"{"key": "phi", "model": "phi3"}"#).unwrap();
        assert!(model.use_documents);
        assert_eq!(model.num_thread, None);
        assert_eq!(model.description, "");
    }
}
