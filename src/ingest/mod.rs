// file: src/ingest/mod.rs
// description: pdf discovery, text extraction and chunking
// reference: internal module structure

pub mod loader;
pub mod normalizer;
pub mod scanner;
pub mod splitter;

pub use loader::PdfLoader;
pub use normalizer::TextNormalizer;
pub use scanner::{PdfScanner, ScannedFile};
pub use splitter::TextSplitter;
