// file: src/index/mod.rs
// description: vector index construction, search and persistence
// reference: internal module structure

pub mod builder;
pub mod store;
pub mod vector;

pub use builder::{BuildOutcome, IndexBuilder, SkippedFile};
pub use store::{IndexStatus, IndexStore, compute_fingerprint};
pub use vector::{IndexEntry, IndexManifest, VectorIndex};
