// file: src/index/builder.rs
// description: ingestion pipeline from scanned pdfs to an embedded vector index
// reference: sequential load, split and embed with per-file error isolation

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::index::store::compute_fingerprint;
use crate::index::vector::{INDEX_FORMAT_VERSION, IndexEntry, IndexManifest, VectorIndex};
use crate::ingest::{PdfLoader, ScannedFile, TextSplitter};
use crate::llm::Embedder;
use crate::models::Chunk;
use crate::pipeline::{PipelineStats, ProgressTracker};
use crate::utils::{OperationTimer, PerformanceMetrics};
use chrono::Utc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub relative_path: String,
    pub reason: String,
}

pub struct BuildOutcome {
    pub index: VectorIndex,
    pub stats: PipelineStats,
    pub skipped: Vec<SkippedFile>,
    pub embedding_metrics: PerformanceMetrics,
}

pub struct IndexBuilder<'a> {
    config: &'a Config,
    embedder: &'a dyn Embedder,
    loader: PdfLoader,
    splitter: TextSplitter,
    show_progress: bool,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(config: &'a Config, embedder: &'a dyn Embedder) -> Self {
        Self {
            config,
            embedder,
            loader: PdfLoader::new(),
            splitter: TextSplitter::new(&config.chunking),
            show_progress: true,
        }
    }

    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Loads and splits every file, skipping the ones that fail to parse.
    pub fn collect_chunks(&self, files: &[ScannedFile]) -> Result<(Vec<Chunk>, PipelineStats, Vec<SkippedFile>)> {
        if files.is_empty() {
            return Err(PipelineError::Ingestion(format!(
                "no PDF files found in {}",
                self.config.documents.pdf_dir.display()
            )));
        }

        let tracker = if self.show_progress {
            ProgressTracker::new(files.len())
        } else {
            ProgressTracker::hidden(files.len())
        };

        let mut chunks = Vec::new();
        let mut skipped = Vec::new();

        for file in files {
            tracker.set_message(file.relative_path.clone());

            match self.loader.load(file) {
                Ok(document) => {
                    let document_chunks = self.splitter.split_document(&document, chunks.len());
                    info!(
                        "Processed {}: {} pages, {} chars, {} chunks",
                        file.relative_path,
                        document.page_count(),
                        document.total_chars(),
                        document_chunks.len()
                    );
                    tracker.add_chunks(document_chunks.len());
                    tracker.add_bytes_processed(file.size);
                    tracker.inc_processed();
                    chunks.extend(document_chunks);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", file.relative_path, e);
                    tracker.println(&format!("  skipped {}: {}", file.relative_path, e));
                    tracker.inc_failed();
                    skipped.push(SkippedFile {
                        relative_path: file.relative_path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracker.finish();
        let stats = tracker.get_stats();

        if chunks.is_empty() {
            return Err(PipelineError::Ingestion(format!(
                "no text could be extracted from {} PDF file(s)",
                files.len()
            )));
        }

        Ok((chunks, stats, skipped))
    }

    pub async fn build(&self, files: &[ScannedFile]) -> Result<BuildOutcome> {
        let timer = OperationTimer::new("index build");
        let (chunks, stats, skipped) = self.collect_chunks(files)?;
        timer.checkpoint("documents split");

        let embed_timer = OperationTimer::new("embedding");
        let mut entries = Vec::with_capacity(chunks.len());
        let batch_size = self.config.ollama.embedding_batch_size.max(1);

        for batch in chunks.chunks(batch_size) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let vectors = self.embedder.embed(&texts).await?;

            if vectors.len() != batch.len() {
                return Err(PipelineError::Ingestion(format!(
                    "embedder returned {} vectors for {} chunks",
                    vectors.len(),
                    batch.len()
                )));
            }

            entries.extend(
                batch
                    .iter()
                    .cloned()
                    .zip(vectors)
                    .map(|(chunk, vector)| IndexEntry { chunk, vector }),
            );
        }
        let embedding_metrics = embed_timer.finish_with_count(entries.len(), "chunks");

        let dimension = entries.first().map_or(0, |e| e.vector.len());
        let processed: Vec<String> = files
            .iter()
            .filter(|f| !skipped.iter().any(|s| s.relative_path == f.relative_path))
            .map(|f| f.relative_path.clone())
            .collect();

        let manifest = IndexManifest {
            version: INDEX_FORMAT_VERSION,
            fingerprint: compute_fingerprint(
                files,
                &self.config.chunking,
                self.embedder.model_name(),
            ),
            embedding_model: self.embedder.model_name().to_string(),
            chunking: self.config.chunking.clone(),
            dimension,
            chunk_count: entries.len(),
            source_files: processed,
            created_at: Utc::now().to_rfc3339(),
        };

        let index = VectorIndex::new(manifest, entries)?;
        timer.finish();

        info!(
            "Built index: {} chunks from {} files ({} skipped)",
            index.len(),
            stats.items_processed,
            skipped.len()
        );

        Ok(BuildOutcome {
            index,
            stats,
            skipped,
            embedding_metrics,
        })
    }
}
