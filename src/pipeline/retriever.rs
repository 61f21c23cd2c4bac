// file: src/pipeline/retriever.rs
// description: question embedding and top-k lookup against the loaded index

use crate::error::Result;
use crate::index::VectorIndex;
use crate::llm::Embedder;
use crate::models::RetrievedChunk;
use crate::utils::OperationTimer;
use std::time::Duration;
use tracing::debug;

pub struct Retrieval {
    pub chunks: Vec<RetrievedChunk>,
    pub elapsed: Duration,
}

pub struct Retriever<'a> {
    embedder: &'a dyn Embedder,
    index: &'a VectorIndex,
    top_k: usize,
}

impl<'a> Retriever<'a> {
    pub fn new(embedder: &'a dyn Embedder, index: &'a VectorIndex, top_k: usize) -> Self {
        Self {
            embedder,
            index,
            top_k,
        }
    }

    pub async fn retrieve(&self, question: &str) -> Result<Retrieval> {
        let timer = OperationTimer::new("retrieval");

        let query = self.embedder.embed_one(question).await?;
        let chunks = self.index.search(&query, self.top_k)?;

        debug!("Retrieved {} chunks for: {}", chunks.len(), question);
        for chunk in &chunks {
            debug!("{}", chunk.format_summary(120));
        }

        Ok(Retrieval {
            chunks,
            elapsed: timer.finish(),
        })
    }
}
