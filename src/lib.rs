// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod models;
pub mod modes;
pub mod pipeline;
pub mod report;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{ChunkingConfig, Config, OllamaConfig};
pub use error::{PipelineError, Result};
pub use index::{IndexBuilder, IndexStatus, IndexStore, VectorIndex};
pub use ingest::{PdfLoader, PdfScanner, ScannedFile, TextSplitter};
pub use llm::{Embedder, GenerationRequest, Generator, OllamaClient, OllamaEmbeddingClient};
pub use models::{Answer, Chunk, Document, ModelConfig, Page, RetrievedChunk};
pub use modes::{MenuState, ModeController};
pub use pipeline::{AnswerGenerator, PipelineStats, ProgressTracker, Retriever};
pub use report::{ReportRow, ReportWriter};
pub use utils::{OperationTimer, PerformanceMetrics, Validator};
