// file: src/models/search_result.rs
// description: Retrieved chunk model with similarity scores
// reference: Used for vector similarity search results

use crate::models::Chunk;
use crate::utils::Validator;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub chunk: Chunk,

    /// Cosine similarity (higher is more similar, -1.0 to 1.0)
    pub score: f32,
}

impl RetrievedChunk {
    pub fn new(chunk: Chunk, score: f32) -> Self {
        Self { chunk, score }
    }

    /// Format as a summary string for display
    pub fn format_summary(&self, max_content_len: usize) -> String {
        format!(
            "Score: {:.4} | {}\n{}\n",
            self.score,
            self.chunk.source_label(),
            Validator::truncate_text(&self.chunk.text, max_content_len)
        )
    }
}
