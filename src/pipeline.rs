//! End-to-end analysis: documents in, topic report out.
//!
//! Two embarrassingly parallel stages fan out over a bounded worker pool:
//! per-document text extraction, then per-topic labeling, rewriting, and
//! resource enrichment. Everything between them is a straight data
//! pipeline over the deduplicated question list.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::extract::{ExtractOptions, ExtractorRegistry};
use crate::model::{RankedQuestion, Report, Topic};
use crate::rank::assign_tiers;
use crate::resources::{NoopVideoProvider, ResourceEnricher, VideoProvider, YoutubeProvider};
use crate::rewrite::QuestionRewriter;
use crate::segment::QuestionSegmenter;
use crate::topics::{target_clusters, Assignment, TopicClusterer, TopicLabeler};

/// Questions shown per topic in the report.
const QUESTIONS_PER_TOPIC: usize = 10;

/// Options for a full analysis run.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Extraction options shared by every document.
    pub extract: ExtractOptions,

    /// Worker count for both fan-out stages.
    pub workers: usize,

    /// Cap on the deduplicated question list.
    pub max_questions: usize,

    /// Query the default video backend. When false, topics carry article
    /// resources only.
    pub fetch_videos: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            workers: 4,
            max_questions: 200,
            fetch_videos: true,
        }
    }
}

impl AnalyzeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extract(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_max_questions(mut self, max_questions: usize) -> Self {
        self.max_questions = max_questions;
        self
    }

    pub fn without_videos(mut self) -> Self {
        self.fetch_videos = false;
        self
    }
}

/// The assembled analysis pipeline.
pub struct Analyzer {
    options: AnalyzeOptions,
    registry: ExtractorRegistry,
    segmenter: QuestionSegmenter,
    clusterer: TopicClusterer,
    labeler: TopicLabeler,
    rewriter: QuestionRewriter,
    enricher: ResourceEnricher,
    pool: Option<rayon::ThreadPool>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::with_options(AnalyzeOptions::default())
    }

    pub fn with_options(options: AnalyzeOptions) -> Self {
        let provider: Arc<dyn VideoProvider> = if options.fetch_videos {
            Arc::new(YoutubeProvider::new())
        } else {
            Arc::new(NoopVideoProvider)
        };
        Self::build(options, provider)
    }

    /// Build with a custom video backend.
    pub fn with_video_provider(options: AnalyzeOptions, provider: Arc<dyn VideoProvider>) -> Self {
        Self::build(options, provider)
    }

    fn build(options: AnalyzeOptions, provider: Arc<dyn VideoProvider>) -> Self {
        let pool = match rayon::ThreadPoolBuilder::new()
            .num_threads(options.workers)
            .build()
        {
            Ok(pool) => Some(pool),
            Err(e) => {
                log::warn!("Worker pool unavailable, running sequentially: {}", e);
                None
            }
        };
        Self {
            registry: ExtractorRegistry::with_defaults(),
            segmenter: QuestionSegmenter::new(),
            clusterer: TopicClusterer::new(),
            labeler: TopicLabeler::new(),
            rewriter: QuestionRewriter::new(),
            enricher: ResourceEnricher::new(provider),
            pool,
            options,
        }
    }

    /// Registry access, for registering additional extractors.
    pub fn registry_mut(&mut self) -> &mut ExtractorRegistry {
        &mut self.registry
    }

    /// Analyze a set of question papers into a topic report.
    pub fn analyze(&self, files: &[PathBuf]) -> Result<Report> {
        fs::create_dir_all(self.options.extract.images_dir())?;

        let texts: Vec<Option<String>> = self.run_parallel(files.to_vec(), |path| {
            match self.registry.extract(&path, &self.options.extract) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    None
                }
            }
        });
        let all_text = texts.into_iter().flatten().collect::<Vec<_>>().join("\n");
        if all_text.trim().is_empty() {
            return Err(Error::NoExtractableText);
        }

        let mut candidates = self.segmenter.candidates(&all_text);
        if candidates.is_empty() {
            candidates = self
                .segmenter
                .fallback_lines(&all_text, self.options.max_questions);
        }
        if candidates.is_empty() {
            return Err(Error::NoQuestions);
        }
        let (questions, frequencies) = self
            .segmenter
            .dedup_questions(&candidates, self.options.max_questions);
        log::debug!("Segmented {} unique questions", questions.len());

        let n_clusters = target_clusters(questions.len());
        let assignment = self
            .clusterer
            .assign(&questions, n_clusters)
            .unwrap_or_else(|degraded| {
                log::warn!("Clustering degraded ({}), using a single topic", degraded);
                Assignment::single_topic(questions.len())
            });
        let tiers = assign_tiers(&frequencies);

        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (index, topic) in assignment.topics.iter().enumerate() {
            groups.entry(topic.primary).or_default().push(index);
        }

        let analysis = self.run_parallel(
            groups.into_iter().collect::<Vec<_>>(),
            |(cluster_id, members)| {
                let member_texts: Vec<&str> =
                    members.iter().map(|&i| questions[i].as_str()).collect();
                let name = self.labeler.label(&member_texts, cluster_id + 1);
                let resources = self.enricher.enrich(&name);

                let mut ranked: Vec<RankedQuestion> = members
                    .iter()
                    .map(|&i| {
                        RankedQuestion::new(
                            self.rewriter.rewrite(&questions[i], &name),
                            tiers[i],
                            frequencies[i],
                        )
                    })
                    .collect();
                ranked.sort_by_key(|question| Reverse(question.frequency));
                ranked.truncate(QUESTIONS_PER_TOPIC);

                Topic {
                    topic_id: cluster_id + 1,
                    name,
                    questions: ranked,
                    resources,
                }
            },
        );

        Ok(Report::new(questions.len(), analysis))
    }

    /// Map items on the worker pool, or inline when the pool failed to
    /// build. Output order follows input order.
    fn run_parallel<I, O, F>(&self, items: Vec<I>, task: F) -> Vec<O>
    where
        I: Send,
        O: Send,
        F: Fn(I) -> O + Send + Sync,
    {
        match &self.pool {
            Some(pool) => pool.install(|| items.into_par_iter().map(task).collect()),
            None => items.into_iter().map(task).collect(),
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::OcrConfig;

    fn offline_options(dir: &std::path::Path) -> AnalyzeOptions {
        AnalyzeOptions::new()
            .with_extract(
                ExtractOptions::default()
                    .with_static_dir(dir.join("static"))
                    .with_ocr(OcrConfig::disabled()),
            )
            .without_videos()
    }

    #[test]
    fn test_options_defaults() {
        let options = AnalyzeOptions::default();
        assert_eq!(options.workers, 4);
        assert_eq!(options.max_questions, 200);
        assert!(options.fetch_videos);
    }

    #[test]
    fn test_no_extractable_text() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.txt");
        fs::write(&empty, "   \n  ").unwrap();

        let analyzer = Analyzer::with_options(offline_options(dir.path()));
        let err = analyzer.analyze(&[empty]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not extract text from any provided files."
        );
    }

    #[test]
    fn test_no_questions_identified() {
        let dir = tempfile::tempdir().unwrap();
        let sparse = dir.path().join("sparse.txt");
        fs::write(&sparse, "abc\nde fg\nhi\n").unwrap();

        let analyzer = Analyzer::with_options(offline_options(dir.path()));
        let err = analyzer.analyze(&[sparse]).unwrap_err();
        assert_eq!(err.to_string(), "No questions identified in the documents.");
    }

    #[test]
    fn test_missing_file_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("paper.txt");
        fs::write(
            &real,
            "1. Explain database normalization with suitable examples.\n",
        )
        .unwrap();

        let analyzer = Analyzer::with_options(offline_options(dir.path()));
        let report = analyzer
            .analyze(&[dir.path().join("missing.txt"), real])
            .unwrap();
        assert_eq!(report.total_questions, 1);
    }

    #[test]
    fn test_sequential_fallback_when_pool_has_zero_threads() {
        // rayon rejects an explicit zero only through its build error path;
        // num_threads(0) means "default", so force the fallback directly.
        let dir = tempfile::tempdir().unwrap();
        let mut analyzer = Analyzer::with_options(offline_options(dir.path()));
        analyzer.pool = None;

        let paper = dir.path().join("paper.txt");
        fs::write(
            &paper,
            "1. Explain database normalization with suitable examples.\n\
             2. Describe deadlock detection in operating systems.\n",
        )
        .unwrap();
        let report = analyzer.analyze(&[paper]).unwrap();
        assert_eq!(report.total_questions, 2);
    }
}
