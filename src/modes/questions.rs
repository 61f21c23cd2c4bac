// file: src/modes/questions.rs
// description: question file loader for batch runs
// reference: https://docs.rs/csv

use crate::error::{PipelineError, Result};
use std::path::Path;
use tracing::debug;

pub const QUESTIONS_HEADER: &str = "Perguntas";
pub const END_MARKER: &str = "/end";

/// Reads the question file: a `Perguntas` header, one question per row and a
/// closing `/end` row. Rows after the marker are ignored.
pub fn load_questions(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PipelineError::invalid_batch_file(path, "file not found")
        } else {
            PipelineError::FileOperation {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let text = String::from_utf8(bytes)
        .map_err(|_| PipelineError::invalid_batch_file(path, "file is not valid UTF-8"))?;

    parse_questions(text.strip_prefix('\u{feff}').unwrap_or(&text), path)
}

pub fn parse_questions(text: &str, path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => join_fields(&record.map_err(|e| csv_error(path, e))?),
        None => return Err(PipelineError::invalid_batch_file(path, "file is empty")),
    };
    if header != QUESTIONS_HEADER {
        return Err(PipelineError::invalid_batch_file(
            path,
            format!("expected header '{}', found '{}'", QUESTIONS_HEADER, header),
        ));
    }

    let mut questions = Vec::new();
    let mut terminated = false;

    for record in records {
        let line = join_fields(&record.map_err(|e| csv_error(path, e))?);
        if line == END_MARKER {
            terminated = true;
            break;
        }
        if !line.is_empty() {
            questions.push(line);
        }
    }

    if questions.is_empty() {
        return Err(PipelineError::invalid_batch_file(path, "no questions found"));
    }
    if !terminated {
        return Err(PipelineError::invalid_batch_file(
            path,
            format!("'{}' terminator not found", END_MARKER),
        ));
    }

    debug!("Loaded {} questions from {}", questions.len(), path.display());
    Ok(questions)
}

/// Unquoted commas split a row into fields; put them back.
fn join_fields(record: &csv::StringRecord) -> String {
    record.iter().collect::<Vec<_>>().join(",").trim().to_string()
}

fn csv_error(path: &Path, error: csv::Error) -> PipelineError {
    PipelineError::invalid_batch_file(path, error.to_string())
}
