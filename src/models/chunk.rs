// file: src/models/chunk.rs
// description: retrieval unit produced by splitting page text
// reference: internal data structures

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of the chunk in the whole index, assigned in ingestion order.
    pub ordinal: usize,
    pub relative_path: String,
    pub file_name: String,
    pub page: u32,
    /// Position of the chunk inside its page.
    pub page_index: usize,
    pub text: String,
}

impl Chunk {
    pub fn source_label(&self) -> String {
        format!("{} (page {})", self.file_name, self.page)
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_label() {
        let chunk = Chunk {
            ordinal: 3,
            relative_path: "standards/80211be.pdf".to_string(),
            file_name: "80211be.pdf".to_string(),
            page: 12,
            page_index: 0,
            text: "EHT".to_string(),
        };

        assert_eq!(chunk.source_label(), "80211be.pdf (page 12)");
        assert_eq!(chunk.char_len(), 3);
    }
}
