// file: src/index/store.rs
// description: Persistent storage for the vector index and its manifest
// reference: json files on disk, manifest written last

use crate::config::ChunkingConfig;
use crate::error::{PipelineError, Result};
use crate::index::vector::{INDEX_FORMAT_VERSION, IndexEntry, IndexManifest, VectorIndex};
use crate::ingest::ScannedFile;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

const MANIFEST_FILE: &str = "manifest.json";
const CHUNKS_FILE: &str = "chunks.json";

#[derive(Debug, Clone, PartialEq)]
pub enum IndexStatus {
    Missing,
    Stale { stored_fingerprint: String },
    Current,
}

/// Hash over every PDF (path and content) plus the settings that shape the
/// chunks and vectors. Any change means the stored index no longer applies.
pub fn compute_fingerprint(
    files: &[ScannedFile],
    chunking: &ChunkingConfig,
    embedding_model: &str,
) -> String {
    let mut sorted: Vec<&ScannedFile> = files.iter().collect();
    sorted.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    let mut hasher = Sha256::new();
    for file in sorted {
        hasher.update(file.relative_path.as_bytes());
        hasher.update([0u8]);
        hasher.update(file.content_hash.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update(chunking.chunk_size.to_le_bytes());
    hasher.update(chunking.chunk_overlap.to_le_bytes());
    hasher.update(chunking.separator.as_bytes());
    hasher.update([0u8]);
    hasher.update(embedding_model.as_bytes());

    format!("{:x}", hasher.finalize())
}

pub struct IndexStore {
    dir: PathBuf,
}

impl IndexStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    fn chunks_path(&self) -> PathBuf {
        self.dir.join(CHUNKS_FILE)
    }

    pub fn exists(&self) -> bool {
        self.manifest_path().is_file() && self.chunks_path().is_file()
    }

    pub async fn read_manifest(&self) -> Result<IndexManifest> {
        if !self.exists() {
            return Err(PipelineError::IndexNotFound {
                path: self.dir.clone(),
            });
        }

        let contents = fs::read_to_string(self.manifest_path())
            .await
            .map_err(|e| PipelineError::FileOperation {
                path: self.manifest_path(),
                source: e,
            })?;

        let manifest: IndexManifest = serde_json::from_str(&contents)?;
        if manifest.version != INDEX_FORMAT_VERSION {
            return Err(PipelineError::Validation(format!(
                "index format version {} is not supported (expected {})",
                manifest.version, INDEX_FORMAT_VERSION
            )));
        }

        Ok(manifest)
    }

    pub async fn status(&self, fingerprint: &str) -> Result<IndexStatus> {
        if !self.exists() {
            debug!("No index found at {}", self.dir.display());
            return Ok(IndexStatus::Missing);
        }

        match self.read_manifest().await {
            Ok(manifest) if manifest.fingerprint == fingerprint => Ok(IndexStatus::Current),
            Ok(manifest) => Ok(IndexStatus::Stale {
                stored_fingerprint: manifest.fingerprint,
            }),
            Err(e) => {
                warn!("Unreadable index manifest, treating index as stale: {}", e);
                Ok(IndexStatus::Stale {
                    stored_fingerprint: String::new(),
                })
            }
        }
    }

    pub async fn load(&self) -> Result<VectorIndex> {
        let manifest = self.read_manifest().await?;

        let contents = fs::read_to_string(self.chunks_path())
            .await
            .map_err(|e| PipelineError::FileOperation {
                path: self.chunks_path(),
                source: e,
            })?;
        let entries: Vec<IndexEntry> = serde_json::from_str(&contents)?;

        let index = VectorIndex::new(manifest, entries)?;
        info!(
            "Loaded index with {} chunks from {}",
            index.len(),
            self.dir.display()
        );
        Ok(index)
    }

    /// Replaces whatever index was stored before. The manifest goes last so
    /// an interrupted save reads back as missing.
    pub async fn save(&self, index: &VectorIndex) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PipelineError::FileOperation {
                path: self.dir.clone(),
                source: e,
            })?;

        self.invalidate().await?;

        let chunks = serde_json::to_string(index.entries())?;
        fs::write(self.chunks_path(), chunks)
            .await
            .map_err(|e| PipelineError::FileOperation {
                path: self.chunks_path(),
                source: e,
            })?;

        let manifest = serde_json::to_string_pretty(index.manifest())?;
        fs::write(self.manifest_path(), manifest)
            .await
            .map_err(|e| PipelineError::FileOperation {
                path: self.manifest_path(),
                source: e,
            })?;

        info!(
            "Saved index with {} chunks to {}",
            index.len(),
            self.dir.display()
        );
        Ok(())
    }

    /// Deletes the stored index files, leaving the directory itself alone.
    pub async fn invalidate(&self) -> Result<()> {
        for path in [self.manifest_path(), self.chunks_path()] {
            match fs::remove_file(&path).await {
                Ok(()) => debug!("Removed {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(PipelineError::FileOperation { path, source: e }),
            }
        }
        Ok(())
    }
}
