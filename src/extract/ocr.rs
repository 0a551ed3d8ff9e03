//! Diagram caption OCR via the Tesseract CLI.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Configuration for diagram OCR.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Whether OCR runs at all.
    pub enabled: bool,

    /// Path to the tesseract binary (relies on PATH by default).
    pub binary: String,

    /// Language passed to tesseract.
    pub language: String,

    /// Seconds to wait for one invocation before killing it.
    pub timeout_secs: u64,

    /// Maximum OCR invocations per document.
    pub max_per_document: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            binary: "tesseract".to_string(),
            language: "eng".to_string(),
            timeout_secs: 30,
            max_per_document: 10,
        }
    }
}

impl OcrConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// A config with OCR turned off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Set the tesseract binary path.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Set the recognition language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the per-invocation timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the per-document invocation cap.
    pub fn with_max_per_document(mut self, max: usize) -> Self {
        self.max_per_document = max;
        self
    }
}

/// Runs tesseract on image files, bounded per document.
///
/// The engine probes binary availability once at construction; when the
/// binary is missing or OCR is disabled, every call returns `None` and the
/// caller simply gets captionless diagrams.
pub struct OcrEngine {
    config: OcrConfig,
    available: bool,
    calls: usize,
}

impl OcrEngine {
    /// Create an engine, probing the binary once.
    pub fn new(config: OcrConfig) -> Self {
        let available = config.enabled && probe(&config.binary);
        if config.enabled && !available {
            log::debug!(
                "tesseract not available at {:?}, diagram captions disabled",
                config.binary
            );
        }
        Self {
            config,
            available,
            calls: 0,
        }
    }

    /// Whether recognition can run at all.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Recognize text in an image file.
    ///
    /// Returns whitespace-collapsed text. Any failure, a timeout, or an
    /// exhausted per-document budget yields `None`.
    pub fn recognize(&mut self, image: &Path) -> Option<String> {
        if !self.available {
            return None;
        }
        if self.calls >= self.config.max_per_document {
            log::debug!("OCR budget exhausted, skipping {}", image.display());
            return None;
        }
        self.calls += 1;

        let mut child = match Command::new(&self.config.binary)
            .arg(image.as_os_str())
            .arg("stdout")
            .arg("-l")
            .arg(&self.config.language)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                log::debug!("Failed to spawn tesseract: {}", e);
                return None;
            }
        };

        // Caption-sized output fits the pipe buffer; anything that blocks
        // past the deadline is killed.
        let deadline = Instant::now() + Duration::from_secs(self.config.timeout_secs);
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        log::debug!("OCR timed out on {}", image.display());
                        return None;
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }
                Err(e) => {
                    log::debug!("OCR wait failed: {}", e);
                    return None;
                }
            }
        };

        if !status.success() {
            log::debug!("tesseract exited with {} on {}", status, image.display());
            return None;
        }

        let mut raw = String::new();
        if let Some(mut stdout) = child.stdout.take() {
            if stdout.read_to_string(&mut raw).is_err() {
                return None;
            }
        }

        let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Check that the tesseract binary answers `--version`.
fn probe(binary: &str) -> bool {
    Command::new(binary)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OcrConfig::default();
        assert!(config.enabled);
        assert_eq!(config.binary, "tesseract");
        assert_eq!(config.language, "eng");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.max_per_document, 10);
    }

    #[test]
    fn test_config_builder() {
        let config = OcrConfig::new()
            .with_binary("/opt/tesseract/bin/tesseract")
            .with_language("deu")
            .with_timeout_secs(5)
            .with_max_per_document(2);
        assert_eq!(config.binary, "/opt/tesseract/bin/tesseract");
        assert_eq!(config.language, "deu");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.max_per_document, 2);
    }

    #[test]
    fn test_disabled_engine_is_unavailable() {
        let mut engine = OcrEngine::new(OcrConfig::disabled());
        assert!(!engine.is_available());
        assert!(engine.recognize(Path::new("diagram.png")).is_none());
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let config = OcrConfig::new().with_binary("/nonexistent/tesseract");
        let mut engine = OcrEngine::new(config);
        assert!(!engine.is_available());
        assert!(engine.recognize(Path::new("diagram.png")).is_none());
    }

    #[test]
    fn test_probe_missing_binary() {
        assert!(!probe("/nonexistent/tesseract"));
    }
}
