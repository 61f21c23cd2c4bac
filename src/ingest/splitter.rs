// file: src/ingest/splitter.rs
// description: separator based character splitter with overlapping windows
// reference: sliding window chunking for rag indexing

use crate::config::ChunkingConfig;
use crate::models::{Chunk, Document};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Splits text on a separator and greedily merges the pieces back into
/// chunks of at most `chunk_size` characters, carrying up to
/// `chunk_overlap` characters of trailing pieces into the next chunk.
///
/// A single piece longer than `chunk_size` is emitted on its own.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separator: String,
}

impl TextSplitter {
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            separator: config.separator.clone(),
        }
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        let pieces: Vec<&str> = if self.separator.is_empty() {
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect()
        } else {
            text.split(self.separator.as_str())
                .filter(|piece| !piece.is_empty())
                .collect()
        };

        self.merge_pieces(&pieces)
    }

    /// Splits every page of `document`, numbering chunks from `first_ordinal`.
    pub fn split_document(&self, document: &Document, first_ordinal: usize) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for page in &document.pages {
            for (page_index, text) in self.split_text(&page.text).into_iter().enumerate() {
                chunks.push(Chunk {
                    ordinal: first_ordinal + chunks.len(),
                    relative_path: document.relative_path.clone(),
                    file_name: document.file_name.clone(),
                    page: page.number,
                    page_index,
                    text,
                });
            }
        }

        debug!(
            "Split {} into {} chunks",
            document.relative_path,
            chunks.len()
        );
        chunks
    }

    fn merge_pieces(&self, pieces: &[&str]) -> Vec<String> {
        let separator_len = self.separator.chars().count();
        let joiner = |count: usize| if count > 0 { separator_len } else { 0 };

        let mut chunks = Vec::new();
        let mut current: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = piece.chars().count();

            if total + len + joiner(current.len()) > self.chunk_size {
                if total > self.chunk_size {
                    warn!(
                        "Created a chunk of {} characters, longer than the configured {}",
                        total, self.chunk_size
                    );
                }

                if !current.is_empty() {
                    if let Some(chunk) = self.join(&current) {
                        chunks.push(chunk);
                    }

                    while total > self.chunk_overlap
                        || (total + len + joiner(current.len()) > self.chunk_size && total > 0)
                    {
                        let separator = if current.len() > 1 { separator_len } else { 0 };
                        match current.pop_front() {
                            Some((_, first_len)) => {
                                total = total.saturating_sub(first_len + separator)
                            }
                            None => break,
                        }
                    }
                }
            }

            current.push_back((piece, len));
            total += len + if current.len() > 1 { separator_len } else { 0 };
        }

        if let Some(chunk) = self.join(&current) {
            chunks.push(chunk);
        }

        chunks
    }

    fn join(&self, pieces: &VecDeque<(&str, usize)>) -> Option<String> {
        let joined = pieces
            .iter()
            .map(|(piece, _)| *piece)
            .collect::<Vec<_>>()
            .join(&self.separator);
        let trimmed = joined.trim();

        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
