//! Content extraction from question paper files.
//!
//! Extraction is extension-driven: each [`ContentExtractor`] declares the
//! extensions it handles and the [`ExtractorRegistry`] dispatches files to
//! the right one. Files nothing can handle contribute no text instead of
//! failing the whole analysis.

mod docx;
mod ocr;
mod pdf;
mod sheet;
mod text;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;

pub use docx::DocxExtractor;
pub use ocr::{OcrConfig, OcrEngine};
pub use pdf::PdfExtractor;
pub use sheet::CsvExtractor;
pub use text::TextExtractor;

/// Options controlling content extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Directory that receives extracted diagram images (under `images/`).
    pub static_dir: PathBuf,

    /// Base URL prefixed to diagram references in the extracted text.
    pub base_url: String,

    /// Maximum number of PDF pages read per document.
    pub max_pages: usize,

    /// Vertical distance (in PDF units) within which words share a line.
    pub line_tolerance: f32,

    /// Minimum drawn width and height for a placed image to count as a
    /// diagram.
    pub min_image_size: f32,

    /// OCR settings for diagram captions.
    pub ocr: OcrConfig,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            base_url: "http://localhost:8000".to_string(),
            max_pages: 10,
            line_tolerance: 5.0,
            min_image_size: 50.0,
            ocr: OcrConfig::default(),
        }
    }
}

impl ExtractOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory that receives diagram images.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    /// Set the base URL used in diagram references.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the PDF page cap.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the OCR configuration.
    pub fn with_ocr(mut self, ocr: OcrConfig) -> Self {
        self.ocr = ocr;
        self
    }

    /// Directory where diagram images are written.
    pub fn images_dir(&self) -> PathBuf {
        self.static_dir.join("images")
    }
}

/// Trait for file-type specific content extractors.
pub trait ContentExtractor: Send + Sync {
    /// File extensions this extractor supports (lowercase, without dot).
    fn supported_extensions(&self) -> &[&str];

    /// Extractor name for lookup and diagnostics.
    fn name(&self) -> &str;

    /// Extract text (and diagram markdown) from the file.
    ///
    /// Returns `Ok(None)` when the file held nothing extractable.
    fn extract(&self, path: &Path, options: &ExtractOptions) -> Result<Option<String>>;

    /// Check if this extractor supports the given extension.
    fn supports_extension(&self, extension: &str) -> bool {
        self.supported_extensions()
            .contains(&extension.to_lowercase().as_str())
    }
}

/// Registry of available content extractors.
pub struct ExtractorRegistry {
    extractors: HashMap<String, Arc<dyn ContentExtractor>>,
    by_name: HashMap<String, Arc<dyn ContentExtractor>>,
}

impl ExtractorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with all built-in extractors registered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfExtractor::new()));
        registry.register(Arc::new(DocxExtractor::new()));
        registry.register(Arc::new(TextExtractor::new()));
        registry.register(Arc::new(CsvExtractor::new()));
        registry
    }

    /// Register an extractor for all of its supported extensions.
    pub fn register(&mut self, extractor: Arc<dyn ContentExtractor>) {
        for ext in extractor.supported_extensions() {
            self.extractors
                .insert(ext.to_lowercase(), Arc::clone(&extractor));
        }
        self.by_name
            .insert(extractor.name().to_string(), extractor);
    }

    /// Get an extractor by file extension.
    pub fn get(&self, extension: &str) -> Option<&Arc<dyn ContentExtractor>> {
        self.extractors.get(&extension.to_lowercase())
    }

    /// Get an extractor by name.
    pub fn get_by_name(&self, name: &str) -> Option<&Arc<dyn ContentExtractor>> {
        self.by_name.get(name)
    }

    /// List all supported extensions.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.extractors.keys().map(|s| s.as_str()).collect()
    }

    /// Extract content from a file, dispatching on its extension.
    ///
    /// Files with a missing or unknown extension yield `Ok(None)` so a
    /// stray upload cannot fail a whole analysis.
    pub fn extract(&self, path: &Path, options: &ExtractOptions) -> Result<Option<String>> {
        let extension = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ext,
            None => {
                log::debug!("Skipping {}: no usable extension", path.display());
                return Ok(None);
            }
        };

        match self.get(extension) {
            Some(extractor) => {
                log::debug!(
                    "Extracting {} with the {} extractor",
                    path.display(),
                    extractor.name()
                );
                extractor.extract(path, options)
            }
            None => {
                log::debug!(
                    "Skipping {}: unsupported extension {:?}",
                    path.display(),
                    extension
                );
                Ok(None)
            }
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockExtractor;

    impl ContentExtractor for MockExtractor {
        fn supported_extensions(&self) -> &[&str] {
            &["mock"]
        }

        fn name(&self) -> &str {
            "mock"
        }

        fn extract(&self, _path: &Path, _options: &ExtractOptions) -> Result<Option<String>> {
            Ok(Some("mock content".to_string()))
        }
    }

    #[test]
    fn test_options_builder() {
        let options = ExtractOptions::new()
            .with_static_dir("/tmp/pyq")
            .with_base_url("http://127.0.0.1:9000")
            .with_max_pages(3);

        assert_eq!(options.static_dir, PathBuf::from("/tmp/pyq"));
        assert_eq!(options.base_url, "http://127.0.0.1:9000");
        assert_eq!(options.max_pages, 3);
        assert_eq!(options.images_dir(), PathBuf::from("/tmp/pyq/images"));
    }

    #[test]
    fn test_registry_defaults() {
        let registry = ExtractorRegistry::with_defaults();
        assert!(registry.get("pdf").is_some());
        assert!(registry.get("PDF").is_some());
        assert!(registry.get("docx").is_some());
        assert!(registry.get("txt").is_some());
        assert!(registry.get("csv").is_some());
        assert!(registry.get("xyz").is_none());
    }

    #[test]
    fn test_registry_by_name() {
        let registry = ExtractorRegistry::with_defaults();
        assert!(registry.get_by_name("pdf").is_some());
        assert!(registry.get_by_name("nope").is_none());
    }

    #[test]
    fn test_supports_extension_case_insensitive() {
        let extractor = MockExtractor;
        assert!(extractor.supports_extension("mock"));
        assert!(extractor.supports_extension("MOCK"));
        assert!(!extractor.supports_extension("other"));
    }

    #[test]
    fn test_unsupported_extension_is_skipped() {
        let registry = ExtractorRegistry::with_defaults();
        let result = registry
            .extract(Path::new("paper.xyz"), &ExtractOptions::default())
            .unwrap();
        assert!(result.is_none());

        let result = registry
            .extract(Path::new("no_extension"), &ExtractOptions::default())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_custom_extractor_dispatch() {
        let mut registry = ExtractorRegistry::new();
        registry.register(Arc::new(MockExtractor));

        let result = registry
            .extract(Path::new("paper.mock"), &ExtractOptions::default())
            .unwrap();
        assert_eq!(result.as_deref(), Some("mock content"));
    }
}
