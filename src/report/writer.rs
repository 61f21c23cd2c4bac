// file: src/report/writer.rs
// description: timestamped csv report files with a utf-8 byte order mark
// reference: https://docs.rs/csv

use crate::error::{PipelineError, Result};
use crate::models::Answer;
use crate::utils::Validator;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
pub const ERROR_PREFIX: &str = "ERROR:";
pub const NO_SOURCES: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Time(s)")]
    pub time_secs: f64,
    #[serde(rename = "Answer")]
    pub answer: String,
    #[serde(rename = "Sources")]
    pub sources: String,
    #[serde(skip)]
    pub failed: bool,
}

impl ReportRow {
    pub fn from_answer(answer: &Answer, question_chars: Option<usize>, answer_chars: usize) -> Self {
        let question = match question_chars {
            Some(max) => Validator::clip_text(&answer.question, max).to_string(),
            None => answer.question.clone(),
        };

        Self {
            model: answer.model.clone(),
            question,
            time_secs: answer.elapsed_secs(),
            answer: Validator::clip_text(&answer.text, answer_chars).to_string(),
            sources: answer.sources_summary(),
            failed: false,
        }
    }

    pub fn failure(model: &str, question: &str, error: &PipelineError) -> Self {
        Self {
            model: model.to_string(),
            question: question.to_string(),
            time_secs: 0.0,
            answer: format!("{} {}", ERROR_PREFIX, error),
            sources: NO_SOURCES.to_string(),
            failed: true,
        }
    }
}

pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn benchmark_file_name(now: DateTime<Local>) -> String {
        format!("benchmark_{}.csv", now.format("%Y%m%d_%H%M%S"))
    }

    pub fn batch_file_name(model_key: &str, now: DateTime<Local>) -> String {
        let key: String = model_key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        format!("results_{}_{}.csv", key, now.format("%Y%m%d_%H%M"))
    }

    pub fn write_benchmark(&self, rows: &[ReportRow]) -> Result<PathBuf> {
        let path = self
            .output_dir
            .join(Self::benchmark_file_name(Local::now()));
        self.write_to(&path, rows)?;
        Ok(path)
    }

    pub fn write_batch(&self, model_key: &str, rows: &[ReportRow]) -> Result<PathBuf> {
        let path = self
            .output_dir
            .join(Self::batch_file_name(model_key, Local::now()));
        self.write_to(&path, rows)?;
        Ok(path)
    }

    pub fn write_to(&self, path: &Path, rows: &[ReportRow]) -> Result<()> {
        if rows.is_empty() {
            return Err(PipelineError::Report("no rows to write".to_string()));
        }

        std::fs::create_dir_all(&self.output_dir).map_err(|e| PipelineError::FileOperation {
            path: self.output_dir.clone(),
            source: e,
        })?;

        let mut file = File::create(path).map_err(|e| PipelineError::FileOperation {
            path: path.to_path_buf(),
            source: e,
        })?;
        file.write_all(UTF8_BOM)?;

        let mut writer = csv::Writer::from_writer(file);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        info!("Wrote {} report rows to {}", rows.len(), path.display());
        Ok(())
    }
}
