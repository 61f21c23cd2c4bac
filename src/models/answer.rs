// file: src/models/answer.rs
// description: generated answer tagged with model, context chunks and timing
// reference: internal data structures

use crate::models::RetrievedChunk;
use crate::utils::telemetry::rounded_secs;
use std::time::Duration;

pub const CONTROL_SOURCES: &str = "N/A (control answer)";

#[derive(Debug, Clone)]
pub struct Answer {
    pub model: String,
    pub question: String,
    pub text: String,
    /// Exactly the chunks that were placed into the prompt.
    pub chunks: Vec<RetrievedChunk>,
    pub retrieval_time: Duration,
    pub generation_time: Duration,
}

impl Answer {
    pub fn elapsed(&self) -> Duration {
        self.retrieval_time + self.generation_time
    }

    /// Seconds rounded to two decimals, as shown in reports.
    pub fn elapsed_secs(&self) -> f64 {
        rounded_secs(self.elapsed())
    }

    pub fn used_documents(&self) -> bool {
        !self.chunks.is_empty()
    }

    pub fn source_labels(&self) -> Vec<String> {
        self.chunks.iter().map(|c| c.chunk.source_label()).collect()
    }

    /// Sources joined as `file.pdf (p.3); other.pdf (p.9)`.
    pub fn sources_summary(&self) -> String {
        if self.chunks.is_empty() {
            return CONTROL_SOURCES.to_string();
        }

        self.chunks
            .iter()
            .map(|c| format!("{} (p.{})", c.chunk.file_name, c.chunk.page))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
