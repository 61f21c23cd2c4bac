// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod answer;
pub mod chunk;
pub mod document;
pub mod model_config;
pub mod search_result;

pub use answer::{Answer, CONTROL_SOURCES};
pub use chunk::Chunk;
pub use document::{Document, Page};
pub use model_config::ModelConfig;
pub use search_result::RetrievedChunk;
