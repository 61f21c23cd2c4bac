// file: src/models/document.rs
// description: source pdf document model with extracted page texts
// reference: internal data structures

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number inside the source PDF.
    pub number: u32,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub file_path: PathBuf,
    pub relative_path: String,
    pub file_name: String,
    pub pages: Vec<Page>,
    pub content_hash: String,
}

impl Document {
    pub fn new(file_path: PathBuf, relative_path: String, pages: Vec<Page>) -> Self {
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| relative_path.clone());
        let content_hash = Self::compute_hash(&pages);

        Self {
            file_path,
            relative_path,
            file_name,
            pages,
            content_hash,
        }
    }

    fn compute_hash(pages: &[Page]) -> String {
        let mut hasher = Sha256::new();
        for page in pages {
            hasher.update(page.number.to_le_bytes());
            hasher.update(page.text.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(|p| p.text.trim().is_empty())
    }
}
