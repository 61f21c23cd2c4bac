// file: src/modes/batch.rs
// description: runs one model over the question file and writes a results report

use crate::error::Result;
use crate::modes::ModeController;
use crate::modes::questions::load_questions;
use crate::pipeline::ProgressTracker;
use crate::report::{ReportRow, ReportWriter, render_table};
use crate::utils::Validator;
use crate::utils::logging::{format_error, format_heading, format_step, format_success, format_warning};
use std::io::{BufRead, Write};
use tracing::{info, warn};

const PROGRESS_QUESTION_CHARS: usize = 70;

impl<R: BufRead, W: Write> ModeController<R, W> {
    pub(super) async fn run_batch(&mut self) -> Result<()> {
        let Some(model) = self.select_model().await? else {
            return Ok(());
        };

        let questions_file = self.config.batch.questions_file.clone();
        let questions = load_questions(&questions_file)?;

        let expected = self.config.batch.expected_questions;
        if questions.len() != expected {
            warn!("Expected {} questions, found {}", expected, questions.len());
            self.say(format_warning(&format!(
                "Expected {} questions, found {}",
                expected,
                questions.len()
            )))?;
        }
        self.say(format_success(&format!(
            "{} questions loaded successfully",
            questions.len()
        )))?;

        if model.use_documents && !self.ensure_index().await? {
            return Ok(());
        }

        let total = questions.len();
        let name = model.display_name();
        self.say(format!("\nStarting test with {} for {} questions", name, total))?;

        let tracker = if self.show_progress {
            ProgressTracker::new(total)
        } else {
            ProgressTracker::hidden(total)
        };
        let answer_chars = self.config.batch.answer_max_chars;
        let mut rows = Vec::with_capacity(total);

        for (i, question) in questions.iter().enumerate() {
            tracker.set_message(Validator::truncate_text(question, PROGRESS_QUESTION_CHARS));
            self.say(format_step(
                i + 1,
                total,
                &Validator::truncate_text(question, PROGRESS_QUESTION_CHARS),
            ))?;

            match self.ask(&model, question).await {
                Ok(answer) => {
                    self.say(format!("   answered in {}s", answer.elapsed_secs()))?;
                    rows.push(ReportRow::from_answer(&answer, None, answer_chars));
                    tracker.inc_processed();
                }
                Err(e) if e.is_recoverable() => {
                    self.say(format!("   {}", format_error(&e.to_string())))?;
                    rows.push(ReportRow::failure(&name, question, &e));
                    tracker.inc_failed();
                }
                Err(e) => return Err(e),
            }
        }
        tracker.finish();
        let stats = tracker.get_stats();

        let path = ReportWriter::new(&self.config.reports.output_dir).write_batch(&model.key, &rows)?;
        self.say(format_success(&format!("File saved: {}", path.display())))?;

        let answered = rows.iter().filter(|r| !r.failed).count();
        let answered_time: f64 = rows.iter().filter(|r| !r.failed).map(|r| r.time_secs).sum();
        let average = if answered == 0 {
            0.0
        } else {
            answered_time / answered as f64
        };

        let summary = vec![
            vec!["Questions".to_string(), total.to_string()],
            vec!["Answered".to_string(), answered.to_string()],
            vec!["Failed".to_string(), (total - answered).to_string()],
            vec!["Average time (s)".to_string(), format!("{:.2}", average)],
            vec!["Total time (s)".to_string(), format!("{:.2}", stats.duration_secs)],
        ];
        self.say(format_heading("\nSUMMARY:"))?;
        self.say(render_table(&["Metric", "Value"], &summary))?;
        self.say(format!("Total questions answered: {}/{}", answered, total))?;

        info!("Batch run with {} finished: {}/{} answered", model.key, answered, total);
        Ok(())
    }
}
