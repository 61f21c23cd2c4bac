// file: src/ingest/scanner.rs
// description: Directory walking and pdf discovery with content hashing
// reference: https://docs.rs/walkdir

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Default)]
pub struct PdfScanner {
    skip_hidden: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub relative_path: String,
    pub size: u64,
    pub content_hash: String,
}

impl PdfScanner {
    pub fn new() -> Self {
        Self { skip_hidden: true }
    }

    pub fn include_hidden(mut self) -> Self {
        self.skip_hidden = false;
        self
    }

    /// Lists every PDF below `root`, sorted by relative path.
    pub fn scan_directory(&self, root: &Path) -> Result<Vec<ScannedFile>> {
        Validator::validate_directory(root).map_err(|e| PipelineError::Ingestion(e.to_string()))?;

        info!("Scanning directory: {}", root.display());
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !(self.skip_hidden && is_hidden(e.path())))
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();

            if !Validator::is_pdf(path) {
                debug!("Skipping non-pdf file: {}", path.display());
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!("Cannot stat {}: {}", path.display(), e);
                    continue;
                }
            };

            let content_hash = match Self::compute_file_hash(path) {
                Ok(hash) => hash,
                Err(e) => {
                    warn!("Cannot read {}: {}", path.display(), e);
                    continue;
                }
            };

            let relative_path = Validator::sanitize_file_path(
                &path.strip_prefix(root).unwrap_or(path).to_string_lossy(),
            );

            files.push(ScannedFile {
                path: path.to_path_buf(),
                relative_path,
                size: metadata.len(),
                content_hash,
            });
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        info!("Found {} pdf files", files.len());
        Ok(files)
    }

    fn compute_file_hash(path: &Path) -> std::io::Result<String> {
        let content = fs::read(path)?;
        let mut hasher = Sha256::new();
        hasher.update(&content);
        Ok(format!("{:x}", hasher.finalize()))
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}
