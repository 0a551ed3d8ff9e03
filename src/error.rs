//! Error types for the pyq library.

use std::io;
use thiserror::Error;

/// Result type alias for pyq operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while analyzing question papers.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading inputs or persisting diagram images.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted and requires a password.
    #[error("Document is encrypted")]
    Encrypted,

    /// The DOCX archive or its main document part could not be read.
    #[error("DOCX parsing error: {0}")]
    DocxParse(String),

    /// The CSV file could not be parsed.
    #[error("CSV parsing error: {0}")]
    CsvParse(String),

    /// Error extracting an embedded image.
    #[error("Image extraction error: {0}")]
    ImageExtract(String),

    /// Every provided file failed extraction or produced no text.
    #[error("Could not extract text from any provided files.")]
    NoExtractableText,

    /// Extraction produced text, but no question could be identified.
    #[error("No questions identified in the documents.")]
    NoQuestions,

    /// Error serializing the report.
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::DocxParse(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::CsvParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

impl Error {
    /// Single-key JSON payload in the shape API callers return for a
    /// failed analysis.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NoExtractableText;
        assert_eq!(
            err.to_string(),
            "Could not extract text from any provided files."
        );

        let err = Error::NoQuestions;
        assert_eq!(err.to_string(), "No questions identified in the documents.");

        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_payload() {
        let payload = Error::NoQuestions.to_payload();
        assert_eq!(
            payload["error"],
            "No questions identified in the documents."
        );
    }
}
