// file: src/ingest/loader.rs
// description: per-page pdf text extraction
// reference: https://docs.rs/lopdf

use crate::error::{PipelineError, Result};
use crate::ingest::normalizer::TextNormalizer;
use crate::ingest::scanner::ScannedFile;
use crate::models::{Document, Page};
use crate::utils::Validator;
use lopdf::Document as PdfDocument;
use tracing::{debug, warn};

pub struct PdfLoader {
    normalizer: TextNormalizer,
}

impl PdfLoader {
    pub fn new() -> Self {
        Self {
            normalizer: TextNormalizer::new(),
        }
    }

    /// Extracts every page of `file`. Pages that fail to extract are skipped;
    /// a file that cannot be opened at all is an error.
    pub fn load(&self, file: &ScannedFile) -> Result<Document> {
        Validator::validate_file_path(&file.path)
            .and_then(|_| Validator::validate_pdf_extension(&file.path))
            .map_err(|e| PipelineError::Pdf {
                path: file.path.clone(),
                message: e.to_string(),
            })?;

        let pdf = PdfDocument::load(&file.path).map_err(|e| PipelineError::Pdf {
            path: file.path.clone(),
            message: e.to_string(),
        })?;

        if pdf.is_encrypted() {
            return Err(PipelineError::Pdf {
                path: file.path.clone(),
                message: "document is encrypted".to_string(),
            });
        }

        let page_numbers: Vec<u32> = pdf.get_pages().keys().copied().collect();
        debug!(
            "{} has {} pages",
            file.relative_path,
            page_numbers.len()
        );

        let mut pages = Vec::with_capacity(page_numbers.len());
        for number in page_numbers {
            match pdf.extract_text(&[number]) {
                Ok(raw) => pages.push(Page {
                    number,
                    text: self.normalizer.normalize(&raw),
                }),
                Err(e) => warn!(
                    "Skipping page {} of {}: {}",
                    number, file.relative_path, e
                ),
            }
        }

        let document = Document::new(file.path.clone(), file.relative_path.clone(), pages);

        if document.is_empty() {
            return Err(PipelineError::Pdf {
                path: file.path.clone(),
                message: "no extractable text".to_string(),
            });
        }

        Ok(document)
    }
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self::new()
    }
}
