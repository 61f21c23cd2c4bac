// file: src/modes/benchmark.rs
// description: runs every configured model on each question and compares latency

use crate::error::Result;
use crate::modes::{ModeController, is_exit_word};
use crate::report::{ReportRow, ReportWriter, render_table};
use crate::utils::Validator;
use crate::utils::logging::{format_error, format_heading, format_success, format_warning};
use std::io::{BufRead, Write};
use tracing::info;

const TABLE_ANSWER_CHARS: usize = 60;

impl<R: BufRead, W: Write> ModeController<R, W> {
    pub(super) async fn run_benchmark(&mut self) -> Result<()> {
        let models = self.config.models.clone();

        self.say(format_heading("\nAUTOMATIC BENCHMARK MODE"))?;
        self.say("Models tested in order:")?;
        for (i, model) in models.iter().enumerate() {
            self.say(format!("{}. {}", i + 1, model.display_name()))?;
        }

        if models.iter().any(|m| m.use_documents) && !self.ensure_index().await? {
            return Ok(());
        }

        let question_chars = self.config.benchmark.question_preview_chars;
        let answer_chars = self.config.benchmark.answer_preview_chars;
        let mut rows: Vec<ReportRow> = Vec::new();

        while let Some(input) =
            self.prompt("\nQuestion (empty repeats the last one, 'sair' to finish): ")?
        {
            if is_exit_word(&input) {
                break;
            }

            let question = if input.is_empty() {
                match &self.last_question {
                    Some(previous) => previous.clone(),
                    None => {
                        self.say(format_warning("No previous question to repeat"))?;
                        continue;
                    }
                }
            } else {
                input
            };
            self.last_question = Some(question.clone());

            self.say(format!("\nProcessing on {} models...", models.len()))?;
            for model in &models {
                let name = model.display_name();
                match self.ask(model, &question).await {
                    Ok(answer) => {
                        self.say(format_success(&format!(
                            "{:<18} | {}s",
                            name,
                            answer.elapsed_secs()
                        )))?;
                        rows.push(ReportRow::from_answer(
                            &answer,
                            Some(question_chars),
                            answer_chars,
                        ));
                    }
                    Err(e) if e.is_recoverable() => {
                        self.say(format_error(&format!("Failed on {}: {}", name, e)))?;
                        rows.push(ReportRow::failure(
                            &name,
                            Validator::clip_text(&question, question_chars),
                            &e,
                        ));
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        if rows.is_empty() {
            self.say(format_warning("No data was collected"))?;
            return Ok(());
        }

        let table_rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                vec![
                    row.model.clone(),
                    format!("{:.2}", row.time_secs),
                    Validator::truncate_text(&row.answer.replace('\n', " "), TABLE_ANSWER_CHARS),
                ]
            })
            .collect();
        self.say(format_heading("\nRESULTS:"))?;
        self.say(render_table(&["Model", "Time(s)", "Answer"], &table_rows))?;

        let path = ReportWriter::new(&self.config.reports.output_dir).write_benchmark(&rows)?;
        info!("Benchmark report with {} rows saved", rows.len());
        self.say(format_success(&format!("Report saved as: {}", path.display())))?;

        Ok(())
    }
}
