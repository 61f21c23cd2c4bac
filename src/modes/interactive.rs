// file: src/modes/interactive.rs
// description: single model question and answer loop

use crate::error::{PipelineError, Result};
use crate::modes::{ModeController, is_exit_word};
use crate::utils::logging::{format_error, format_info, format_success};
use std::io::{BufRead, Write};

impl<R: BufRead, W: Write> ModeController<R, W> {
    pub(super) async fn run_interactive(&mut self) -> Result<()> {
        self.say("\nSystem setup")?;
        let Some(model) = self.select_model().await? else {
            return Ok(());
        };

        if model.use_documents && !self.ensure_index().await? {
            return Ok(());
        }

        self.say(format_success(&format!(
            "System ready! Model: {}",
            model.display_name()
        )))?;
        self.say(format_info("Type your questions, or 'sair' to go back to the menu."))?;

        while let Some(question) = self.prompt("\nQuestion: ")? {
            if question.is_empty() {
                continue;
            }
            if is_exit_word(&question) {
                break;
            }

            self.last_question = Some(question.clone());
            self.say("\nProcessing...")?;
            match self.ask(&model, &question).await {
                Ok(answer) => {
                    self.say(format!("\nAnswer ({}s):", answer.elapsed_secs()))?;
                    self.say(&answer.text)?;

                    if answer.used_documents() {
                        self.say("\nSources used:")?;
                        for label in answer.source_labels() {
                            self.say(format!("- {}", label))?;
                        }
                    }
                }
                Err(e) if e.is_recoverable() => {
                    self.say(format_error(&e.to_string()))?;
                    if matches!(e, PipelineError::ModelUnavailable { .. }) {
                        self.say("Hint: check that the Ollama server is running ('ollama serve')")?;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }
}
