// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: retrieval and generation stages

mod generator;
mod progress;
mod retriever;

pub use generator::AnswerGenerator;
pub use progress::{PipelineStats, ProgressTracker};
pub use retriever::{Retrieval, Retriever};
