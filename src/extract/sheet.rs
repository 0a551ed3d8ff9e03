//! CSV question sheet extraction.

use std::path::Path;

use crate::error::Result;

use super::{ContentExtractor, ExtractOptions};

/// Extractor for `.csv` question sheets.
///
/// When a header contains "question" (or just a "q"), only that column is
/// read, one value per line. Otherwise the whole table is dumped row by
/// row so the segmenter still sees every cell.
pub struct CsvExtractor;

impl CsvExtractor {
    /// Create a new CSV extractor.
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor for CsvExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["csv"]
    }

    fn name(&self) -> &str {
        "csv"
    }

    fn extract(&self, path: &Path, _options: &ExtractOptions) -> Result<Option<String>> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

        let headers = reader.headers()?.clone();
        let question_column = headers.iter().position(|header| {
            let header = header.to_lowercase();
            header.contains("question") || header.contains('q')
        });

        match question_column {
            Some(index) => {
                let mut values = Vec::new();
                for record in reader.records() {
                    let record = record?;
                    if let Some(value) = record.get(index) {
                        if !value.trim().is_empty() {
                            values.push(value.to_string());
                        }
                    }
                }
                Ok(Some(values.join("\n")))
            }
            None => {
                let mut lines = vec![headers.iter().collect::<Vec<_>>().join(" ")];
                for record in reader.records() {
                    let record = record?;
                    lines.push(record.iter().collect::<Vec<_>>().join(" "));
                }
                Ok(Some(lines.join("\n")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_question_column_selected() {
        let file = csv_file(
            "Sno,Question,Marks\n\
             1,What is a deadlock?,5\n\
             2,Explain paging in detail.,10\n",
        );

        let extractor = CsvExtractor::new();
        let text = extractor
            .extract(file.path(), &ExtractOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(text, "What is a deadlock?\nExplain paging in detail.");
    }

    #[test]
    fn test_q_header_matches() {
        let file = csv_file("Q,Answer\nDefine a socket.,A connection endpoint\n");

        let extractor = CsvExtractor::new();
        let text = extractor
            .extract(file.path(), &ExtractOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(text, "Define a socket.");
    }

    #[test]
    fn test_empty_cells_are_skipped() {
        let file = csv_file("Question\nWhat is an index?\n\nDefine a view.\n");

        let extractor = CsvExtractor::new();
        let text = extractor
            .extract(file.path(), &ExtractOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(text, "What is an index?\nDefine a view.");
    }

    #[test]
    fn test_table_dump_without_question_column() {
        let file = csv_file("Topic,Marks\nDeadlocks,5\nPaging,10\n");

        let extractor = CsvExtractor::new();
        let text = extractor
            .extract(file.path(), &ExtractOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(text, "Topic Marks\nDeadlocks 5\nPaging 10");
    }

    #[test]
    fn test_quoted_fields() {
        let file = csv_file("Question\n\"Compare TCP, UDP and SCTP.\"\n");

        let extractor = CsvExtractor::new();
        let text = extractor
            .extract(file.path(), &ExtractOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(text, "Compare TCP, UDP and SCTP.");
    }
}
