//! # pyq
//!
//! Previous-year question paper analysis library for Rust.
//!
//! This library turns a pile of question papers (PDF, DOCX, plain text,
//! CSV) into a structured study guide: questions are extracted and
//! deduplicated, clustered into topics, ranked by how often they recur,
//! rewritten into clean exam prompts, and paired with learning resources.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::PathBuf;
//! use pyq::analyze_files;
//!
//! fn main() -> pyq::Result<()> {
//!     let files = vec![
//!         PathBuf::from("papers/dbms_2023.pdf"),
//!         PathBuf::from("papers/dbms_2024.pdf"),
//!     ];
//!     let report = analyze_files(&files)?;
//!
//!     for topic in &report.analysis {
//!         println!("{} ({} questions)", topic.name, topic.questions.len());
//!     }
//!     println!("{}", report.to_json_pretty()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Multiple input formats**: PDF, DOCX, plain text, CSV
//! - **Diagram handling**: embedded images become Markdown references,
//!   with optional OCR captions
//! - **Topic discovery**: seeded TF-IDF k-means with an LDA cross-check,
//!   reproducible across runs
//! - **Importance ranking**: recurrence quantiles split questions into
//!   standard, important, and critical tiers
//! - **Resource enrichment**: curated article links plus a pluggable
//!   video search backend
//! - **Parallel processing**: uses Rayon for multi-document workloads

pub mod error;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod rank;
pub mod resources;
pub mod rewrite;
pub mod segment;
pub mod topics;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extract::{ContentExtractor, ExtractOptions, ExtractorRegistry, OcrConfig};
pub use model::{
    ArticleResource, ImportanceTier, RankedQuestion, Report, ResourceBundle, Summary,
    TierBreakdown, Topic, VideoResource,
};
pub use pipeline::{AnalyzeOptions, Analyzer};
pub use resources::{NoopVideoProvider, ResourceEnricher, VideoProvider, YoutubeProvider};
pub use rewrite::QuestionRewriter;
pub use segment::QuestionSegmenter;
pub use topics::{TopicClusterer, TopicLabeler};

use std::path::PathBuf;

/// Analyze question papers with default options.
///
/// # Arguments
///
/// * `files` - Paths to the question paper files
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
/// use pyq::analyze_files;
///
/// let report = analyze_files(&[PathBuf::from("papers/os_2024.pdf")]).unwrap();
/// println!("Found {} topics", report.topics_found);
/// ```
pub fn analyze_files(files: &[PathBuf]) -> Result<Report> {
    Analyzer::new().analyze(files)
}

/// Analyze question papers with custom options.
///
/// # Example
///
/// ```no_run
/// use std::path::PathBuf;
/// use pyq::{analyze_files_with_options, AnalyzeOptions, ExtractOptions};
///
/// let options = AnalyzeOptions::new()
///     .with_extract(ExtractOptions::new().with_static_dir("/var/pyq/static"))
///     .with_workers(8)
///     .without_videos();
/// let report =
///     analyze_files_with_options(&[PathBuf::from("paper.docx")], options).unwrap();
/// println!("{}", report.to_json().unwrap());
/// ```
pub fn analyze_files_with_options(files: &[PathBuf], options: AnalyzeOptions) -> Result<Report> {
    Analyzer::with_options(options).analyze(files)
}
