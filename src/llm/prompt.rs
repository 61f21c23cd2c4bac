// file: src/llm/prompt.rs
// description: prompt assembly from retrieved chunks and the user question

use crate::config::OllamaConfig;
use crate::llm::GenerationRequest;
use crate::models::{ModelConfig, RetrievedChunk};

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    context_instruction: String,
    answer_instruction: String,
    rag_system_prompt: String,
    control_system_prompt: String,
    default_temperature: f32,
}

impl PromptBuilder {
    pub fn new(config: &OllamaConfig) -> Self {
        Self {
            context_instruction: config.context_instruction.clone(),
            answer_instruction: config.answer_instruction.clone(),
            rag_system_prompt: config.rag_system_prompt.clone(),
            control_system_prompt: config.control_system_prompt.clone(),
            default_temperature: config.temperature,
        }
    }

    pub fn format_context(chunks: &[RetrievedChunk]) -> String {
        chunks
            .iter()
            .map(|retrieved| {
                format!(
                    "Source: {} (Page {})\nContent: {}\n------",
                    retrieved.chunk.file_name, retrieved.chunk.page, retrieved.chunk.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn build_prompt(&self, question: &str, chunks: &[RetrievedChunk]) -> String {
        format!(
            "{}\n{}\n{}\nQuestion: {}",
            self.context_instruction,
            Self::format_context(chunks),
            self.answer_instruction,
            question
        )
    }

    /// Control models get the bare question; everyone else gets the
    /// retrieved context wrapped in the instructions.
    pub fn request(
        &self,
        model: &ModelConfig,
        question: &str,
        chunks: &[RetrievedChunk],
    ) -> GenerationRequest {
        let (prompt, system) = if model.use_documents {
            (self.build_prompt(question, chunks), &self.rag_system_prompt)
        } else {
            (question.to_string(), &self.control_system_prompt)
        };

        GenerationRequest {
            model: model.model.clone(),
            prompt,
            system: Some(system.clone()).filter(|s| !s.trim().is_empty()),
            temperature: Some(model.temperature.unwrap_or(self.default_temperature)),
            num_thread: model.num_thread,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::Chunk;
    use pretty_assertions::assert_eq;

    fn retrieved(file: &str, page: u32, text: &str) -> RetrievedChunk {
        RetrievedChunk::new(
            Chunk {
                ordinal: 0,
                relative_path: file.to_string(),
                file_name: file.to_string(),
                page,
                page_index: 0,
                text: text.to_string(),
            },
            0.9,
        )
    }

    #[test]
    fn test_build_prompt_layout() {
        let builder = PromptBuilder::new(&Config::default_config().ollama);
        let chunks = vec![
            retrieved("be.pdf", 3, "MLO aggregates links."),
            retrieved("ax.pdf", 9, "OFDMA splits channels."),
        ];

        let prompt = builder.build_prompt("What is MLO?", &chunks);

        assert_eq!(
            prompt,
            "Based on these excerpts:\n\
             Source: be.pdf (Page 3)\nContent: MLO aggregates links.\n------\n\n\
             Source: ax.pdf (Page 9)\nContent: OFDMA splits channels.\n------\n\
             Answer the question below in your own words.\n\
             Question: What is MLO?"
        );
    }

    #[test]
    fn test_request_for_rag_model() {
        let config = Config::default_config();
        let builder = PromptBuilder::new(&config.ollama);
        let model = &config.models[2];
        let chunks = vec![retrieved("be.pdf", 1, "320 MHz")];

        let request = builder.request(model, "Channel width?", &chunks);

        assert_eq!(request.model, "tinyllama");
        assert_eq!(request.num_thread, Some(2));
        assert_eq!(request.temperature, Some(0.3));
        assert!(request.prompt.contains("320 MHz"));
        assert_eq!(request.system.as_deref(), Some(config.ollama.rag_system_prompt.as_str()));
    }

    #[test]
    fn test_request_for_control_model() {
        let config = Config::default_config();
        let builder = PromptBuilder::new(&config.ollama);
        let model = &config.models[3];

        let request = builder.request(model, "Channel width?", &[]);

        assert_eq!(request.model, "llama2");
        assert_eq!(request.prompt, "Channel width?");
        assert_eq!(
            request.system.as_deref(),
            Some(config.ollama.control_system_prompt.as_str())
        );
    }
}
