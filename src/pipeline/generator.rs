// file: src/pipeline/generator.rs
// description: prompt assembly and timed generation for a single model
// reference: retrieval-augmented generation over the local inference server

use crate::config::OllamaConfig;
use crate::error::Result;
use crate::llm::{Generator, PromptBuilder};
use crate::models::{Answer, ModelConfig, RetrievedChunk};
use crate::utils::{OperationTimer, Validator};
use std::time::Duration;
use tracing::debug;

pub struct AnswerGenerator<'a> {
    generator: &'a dyn Generator,
    prompts: PromptBuilder,
}

impl<'a> AnswerGenerator<'a> {
    pub fn new(generator: &'a dyn Generator, config: &OllamaConfig) -> Self {
        Self {
            generator,
            prompts: PromptBuilder::new(config),
        }
    }

    /// Control models drop the chunks, so the answer records exactly what the
    /// model was given.
    pub async fn answer(
        &self,
        model: &ModelConfig,
        question: &str,
        chunks: Vec<RetrievedChunk>,
        retrieval_time: Duration,
    ) -> Result<Answer> {
        Validator::validate_content_not_empty(question)?;

        let (chunks, retrieval_time) = if model.use_documents {
            (chunks, retrieval_time)
        } else {
            (Vec::new(), Duration::ZERO)
        };

        let request = self.prompts.request(model, question, &chunks);
        debug!(
            "Prompting {} with {} chunks ({} chars)",
            model.model,
            chunks.len(),
            request.prompt.chars().count()
        );

        let timer = OperationTimer::new(&format!("generation with {}", model.key));
        let text = self.generator.generate(&request).await?;
        let generation_time = timer.finish();

        Ok(Answer {
            model: model.display_name(),
            question: question.to_string(),
            text: text.trim().to_string(),
            chunks,
            retrieval_time,
            generation_time,
        })
    }
}
