//! DOCX text extraction.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

use super::{ContentExtractor, ExtractOptions};

/// Extractor for `.docx` documents.
///
/// Reads `word/document.xml` out of the archive and collects `<w:t>` text
/// runs; every paragraph end becomes a newline.
pub struct DocxExtractor;

impl DocxExtractor {
    /// Create a new DOCX extractor.
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor for DocxExtractor {
    fn supported_extensions(&self) -> &[&str] {
        &["docx"]
    }

    fn name(&self) -> &str {
        "docx"
    }

    fn extract(&self, path: &Path, _options: &ExtractOptions) -> Result<Option<String>> {
        let file = File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)?;

        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .map_err(|_| Error::DocxParse("missing word/document.xml".to_string()))?
            .read_to_string(&mut xml)?;

        Ok(Some(paragraph_text(&xml)))
    }
}

/// Collect the text runs of every paragraph, one paragraph per line.
fn paragraph_text(xml: &str) -> String {
    let mut out = String::new();
    let mut i = 0;

    while let Some(offset) = xml[i..].find('<') {
        let tag_start = i + offset;
        let tag_end = match xml[tag_start..].find('>') {
            Some(end) => tag_start + end,
            None => break,
        };
        let tag = &xml[tag_start + 1..tag_end];

        if (tag == "w:t" || tag.starts_with("w:t ")) && !tag.ends_with('/') {
            let content_start = tag_end + 1;
            match xml[content_start..].find("</w:t>") {
                Some(close) => {
                    out.push_str(&decode_entities(&xml[content_start..content_start + close]));
                    i = content_start + close + "</w:t>".len();
                    continue;
                }
                None => break,
            }
        } else if tag == "/w:p" || tag == "w:p/" || (tag.starts_with("w:p ") && tag.ends_with('/'))
        {
            out.push('\n');
        } else if tag == "w:tab/" || tag.starts_with("w:tab ") {
            out.push('\t');
        } else if tag == "w:br/"
            || tag == "w:cr/"
            || tag.starts_with("w:br ")
            || tag.starts_with("w:cr ")
        {
            out.push('\n');
        }

        i = tag_end + 1;
    }

    out
}

/// Decode the XML entities that appear in document parts.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn docx_file(document_xml: &str) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        let mut writer = zip::ZipWriter::new(file.reopen().unwrap());
        writer
            .start_file("word/document.xml", zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap();
        file
    }

    #[test]
    fn test_paragraph_text() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Q1: What is an index?</w:t></w:r></w:p>
            <w:p><w:r><w:t xml:space="preserve">Explain </w:t></w:r><w:r><w:t>B-trees.</w:t></w:r></w:p>
        </w:body></w:document>"#;

        let text = paragraph_text(xml);
        assert!(text.contains("Q1: What is an index?\n"));
        assert!(text.contains("Explain B-trees.\n"));
    }

    #[test]
    fn test_empty_paragraphs_and_breaks() {
        let xml = "<w:p><w:r><w:t>One</w:t><w:br/><w:t>Two</w:t></w:r></w:p><w:p/>";
        assert_eq!(paragraph_text(xml), "One\nTwo\n\n");
    }

    #[test]
    fn test_entities_decoded() {
        let xml = "<w:p><w:r><w:t>a &lt; b &amp;&amp; b &gt; c</w:t></w:r></w:p>";
        assert_eq!(paragraph_text(xml), "a < b && b > c\n");
    }

    #[test]
    fn test_extract_from_archive() {
        let file = docx_file(
            "<w:document><w:body><w:p><w:r><w:t>1. Define deadlock.</w:t></w:r></w:p></w:body></w:document>",
        );

        let extractor = DocxExtractor::new();
        let text = extractor
            .extract(file.path(), &ExtractOptions::default())
            .unwrap()
            .unwrap();
        assert_eq!(text, "1. Define deadlock.\n");
    }

    #[test]
    fn test_missing_document_part() {
        let file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        let mut writer = zip::ZipWriter::new(file.reopen().unwrap());
        writer
            .start_file("word/other.xml", zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(b"<w:p/>").unwrap();
        writer.finish().unwrap();

        let extractor = DocxExtractor::new();
        let result = extractor.extract(file.path(), &ExtractOptions::default());
        assert!(matches!(result, Err(Error::DocxParse(_))));
    }

    #[test]
    fn test_not_a_zip() {
        let mut file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        file.write_all(b"plainly not an archive").unwrap();

        let extractor = DocxExtractor::new();
        let result = extractor.extract(file.path(), &ExtractOptions::default());
        assert!(result.is_err());
    }
}
