// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            PipelineError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(PipelineError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PipelineError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn is_pdf(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
    }

    pub fn validate_pdf_extension(path: &Path) -> Result<()> {
        if Self::is_pdf(path) {
            Ok(())
        } else {
            Err(PipelineError::Validation(format!(
                "File is not a PDF: {}",
                path.display()
            )))
        }
    }

    pub fn validate_content_not_empty(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(PipelineError::Validation("Content is empty".to_string()));
        }
        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PipelineError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn sanitize_file_path(path: &str) -> String {
        path.replace('\\', "/")
            .replace("//", "/")
            .trim()
            .to_string()
    }

    /// Cuts after `max_chars` characters and appends `...` when something was cut.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            None => text.to_string(),
            Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        }
    }

    /// Like `truncate_text` but without the ellipsis.
    pub fn clip_text(text: &str, max_chars: usize) -> &str {
        match text.char_indices().nth(max_chars) {
            None => text,
            Some((byte_idx, _)) => &text[..byte_idx],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_file_path() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("test.pdf");
        fs::write(&file_path, "test").unwrap();

        assert!(Validator::validate_file_path(&file_path).is_ok());
        assert!(Validator::validate_file_path(temp.path()).is_err());
        assert!(Validator::validate_file_path(Path::new("/nonexistent")).is_err());
    }

    #[test]
    fn test_validate_directory() {
        let temp = TempDir::new().unwrap();
        assert!(Validator::validate_directory(temp.path()).is_ok());
        assert!(Validator::validate_directory(Path::new("/nonexistent")).is_err());
    }

    #[test]
    fn test_validate_pdf_extension() {
        assert!(Validator::validate_pdf_extension(Path::new("paper.pdf")).is_ok());
        assert!(Validator::validate_pdf_extension(Path::new("PAPER.PDF")).is_ok());
        assert!(Validator::validate_pdf_extension(Path::new("notes.txt")).is_err());
        assert!(Validator::validate_pdf_extension(Path::new("pdf")).is_err());
    }

    #[test]
    fn test_validate_content_not_empty() {
        assert!(Validator::validate_content_not_empty("content").is_ok());
        assert!(Validator::validate_content_not_empty("").is_err());
        assert!(Validator::validate_content_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(Validator::validate_url("http://localhost:11434").is_ok());
        assert!(Validator::validate_url("https://example.com").is_ok());
        assert!(Validator::validate_url("localhost:11434").is_err());
    }

    #[test]
    fn test_sanitize_file_path() {
        assert_eq!(
            Validator::sanitize_file_path("docs\\wifi\\be.pdf"),
            "docs/wifi/be.pdf"
        );
        assert_eq!(Validator::sanitize_file_path("  docs//be.pdf  "), "docs/be.pdf");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a ..."
        );
        assert_eq!(Validator::truncate_text("ação rápida", 4), "ação...");
    }

    #[test]
    fn test_clip_text() {
        assert_eq!(Validator::clip_text("Pergunta longa", 8), "Pergunta");
        assert_eq!(Validator::clip_text("curta", 8), "curta");
    }
}
