// file: src/ingest/normalizer.rs
// description: whitespace normalization for text extracted from pdf pages
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INLINE_SPACES: Regex =
        Regex::new(r"[ \t\u{00A0}\u{000C}]+").expect("INLINE_SPACES regex is valid");
    static ref EXCESS_BLANK_LINES: Regex =
        Regex::new(r"\n{3,}").expect("EXCESS_BLANK_LINES regex is valid");
}

/// Tidies whitespace only. Words stay exactly as the page extraction
/// produced them, including hyphens at line ends.
#[derive(Debug, Default)]
pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, text: &str) -> String {
        let mut normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        normalized = normalized.replace('\u{0}', "");

        normalized = INLINE_SPACES.replace_all(&normalized, " ").into_owned();
        normalized = normalized
            .lines()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n");

        EXCESS_BLANK_LINES
            .replace_all(&normalized, "\n\n")
            .trim()
            .to_string()
    }
}
