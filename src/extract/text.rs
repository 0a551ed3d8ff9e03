//! Plain text extraction.

use std::fs;
use std::path::Path;

use crate::error::Result;

use super::{ContentExtractor, ExtractOptions};

/// Extractor for plain `.txt` files.
pub struct TextExtractor;

impl TextExtractor {
    /// Create a new text extractor.
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor for TextExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn name(&self) -> &str {
        "text"
    }

    fn extract(&self, path: &Path, _options: &ExtractOptions) -> Result<Option<String>> {
        let bytes = fs::read(path)?;
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_extract_plain_text() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "1. What is a primary key?").unwrap();
        writeln!(file, "2. Explain normalization in detail.").unwrap();

        let extractor = TextExtractor::new();
        let text = extractor
            .extract(file.path(), &ExtractOptions::default())
            .unwrap()
            .unwrap();
        assert!(text.contains("primary key"));
        assert!(text.contains("normalization"));
    }

    #[test]
    fn test_extract_invalid_utf8_is_lossy() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"Q1: What is a \xFF\xFE socket?").unwrap();

        let extractor = TextExtractor::new();
        let text = extractor
            .extract(file.path(), &ExtractOptions::default())
            .unwrap()
            .unwrap();
        assert!(text.contains("socket"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_extract_missing_file() {
        let extractor = TextExtractor::new();
        let result = extractor.extract(Path::new("/nonexistent/paper.txt"), &ExtractOptions::default());
        assert!(result.is_err());
    }
}
