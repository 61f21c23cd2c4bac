// file: src/index/vector.rs
// description: in-memory flat vector index with cosine similarity search
// reference: brute-force nearest neighbour search over normalized vectors

use crate::config::ChunkingConfig;
use crate::error::{PipelineError, Result};
use crate::models::{Chunk, RetrievedChunk};
use serde::{Deserialize, Serialize};

pub const INDEX_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

/// Describes the folder snapshot and settings an index was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexManifest {
    pub version: u32,
    pub fingerprint: String,
    pub embedding_model: String,
    pub chunking: ChunkingConfig,
    pub dimension: usize,
    pub chunk_count: usize,
    pub source_files: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct VectorIndex {
    manifest: IndexManifest,
    entries: Vec<IndexEntry>,
    norms: Vec<f32>,
}

impl VectorIndex {
    pub fn new(manifest: IndexManifest, entries: Vec<IndexEntry>) -> Result<Self> {
        if entries.len() != manifest.chunk_count {
            return Err(PipelineError::Validation(format!(
                "index holds {} entries but manifest lists {}",
                entries.len(),
                manifest.chunk_count
            )));
        }

        if let Some(bad) = entries
            .iter()
            .find(|entry| entry.vector.len() != manifest.dimension)
        {
            return Err(PipelineError::Validation(format!(
                "chunk {} has dimension {}, expected {}",
                bad.chunk.ordinal,
                bad.vector.len(),
                manifest.dimension
            )));
        }

        let norms = entries.iter().map(|entry| norm(&entry.vector)).collect();

        Ok(Self {
            manifest,
            entries,
            norms,
        })
    }

    pub fn manifest(&self) -> &IndexManifest {
        &self.manifest
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|entry| &entry.chunk)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns at most `k` chunks by descending cosine similarity; equal
    /// scores keep index order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<RetrievedChunk>> {
        if query.len() != self.manifest.dimension {
            return Err(PipelineError::Validation(format!(
                "query has dimension {}, index expects {}",
                query.len(),
                self.manifest.dimension
            )));
        }

        let query_norm = norm(query);
        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .zip(&self.norms)
            .enumerate()
            .map(|(i, (entry, entry_norm))| {
                (i, cosine(query, query_norm, &entry.vector, *entry_norm))
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, score)| RetrievedChunk::new(self.entries[i].chunk.clone(), score))
            .collect())
    }
}

fn norm(vector: &[f32]) -> f32 {
    vector.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn cosine(a: &[f32], norm_a: f32, b: &[f32], norm_b: f32) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (norm_a * norm_b)
}
