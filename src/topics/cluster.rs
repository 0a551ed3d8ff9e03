//! Topic assignment: mini-batch k-means over tf-idf rows, with an LDA
//! secondary pass over raw counts.
//!
//! Both algorithms run from a fixed seed so repeated analyses of the same
//! papers produce the same grouping. Degenerate inputs surface as
//! [`DegradedAssignment`] and the caller decides how to fall back.

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::features::Vectorizer;

/// Bounds and seeds for both clustering passes.
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Seed shared by centroid initialization and Gibbs sampling.
    pub seed: u64,
    /// Maximum mini-batch iterations per restart.
    pub max_iterations: usize,
    /// Mini-batch size (capped at the corpus size).
    pub batch_size: usize,
    /// Number of k-means restarts; lowest inertia wins.
    pub n_init: usize,
    /// Gibbs sweeps over the corpus.
    pub lda_sweeps: usize,
    /// Symmetric document-topic prior.
    pub alpha: f64,
    /// Symmetric topic-term prior.
    pub beta: f64,
    /// Vocabulary cap for both feature variants.
    pub max_features: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_iterations: 50,
            batch_size: 32,
            n_init: 3,
            lda_sweeps: 5,
            alpha: 0.1,
            beta: 0.01,
            max_features: 50,
        }
    }
}

/// Per-question cluster ids from the two passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicAssignment {
    pub primary: usize,
    pub secondary: usize,
}

/// A complete clustering outcome.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub topics: Vec<TopicAssignment>,
    pub n_clusters: usize,
}

impl Assignment {
    /// Everything in cluster 0, for corpora too small or too uniform to
    /// partition.
    pub fn single_topic(len: usize) -> Self {
        Self {
            topics: vec![
                TopicAssignment {
                    primary: 0,
                    secondary: 0,
                };
                len
            ],
            n_clusters: 1,
        }
    }
}

/// Why clustering could not run on this corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradedAssignment {
    TooFewQuestions { available: usize, requested: usize },
    EmptyVocabulary,
}

impl fmt::Display for DegradedAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradedAssignment::TooFewQuestions {
                available,
                requested,
            } => write!(
                f,
                "{} questions cannot fill {} clusters",
                available, requested
            ),
            DegradedAssignment::EmptyVocabulary => {
                write!(f, "no vocabulary survived stop-word filtering")
            }
        }
    }
}

/// Cluster count scaled to corpus size, bounded to `[3, 8]`.
pub fn target_clusters(question_count: usize) -> usize {
    (question_count / 5).clamp(3, 8)
}

/// Seeded two-pass clusterer.
pub struct TopicClusterer {
    config: ClusterConfig,
}

impl TopicClusterer {
    pub fn new() -> Self {
        Self::with_config(ClusterConfig::default())
    }

    pub fn with_config(config: ClusterConfig) -> Self {
        Self { config }
    }

    /// Assign every question a primary and secondary cluster id in
    /// `[0, n_clusters)`.
    pub fn assign(
        &self,
        questions: &[String],
        n_clusters: usize,
    ) -> Result<Assignment, DegradedAssignment> {
        if n_clusters == 0 || questions.len() < n_clusters {
            return Err(DegradedAssignment::TooFewQuestions {
                available: questions.len(),
                requested: n_clusters,
            });
        }

        let vectorizer = Vectorizer::fit(questions, self.config.max_features);
        if vectorizer.is_empty() {
            return Err(DegradedAssignment::EmptyVocabulary);
        }
        let weighted = vectorizer.tfidf_rows(questions);
        if weighted.iter().all(|row| row.iter().all(|&v| v == 0.0)) {
            return Err(DegradedAssignment::EmptyVocabulary);
        }

        let primary = self.minibatch_kmeans(&weighted, n_clusters);
        let counts = vectorizer.count_rows(questions);
        let secondary = self.gibbs_lda(&counts, n_clusters);

        let topics = primary
            .into_iter()
            .zip(secondary)
            .map(|(primary, secondary)| TopicAssignment { primary, secondary })
            .collect();
        Ok(Assignment { topics, n_clusters })
    }

    fn minibatch_kmeans(&self, rows: &[Vec<f64>], k: usize) -> Vec<usize> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let batch = self.config.batch_size.min(rows.len());

        let mut best_centroids: Vec<Vec<f64>> = Vec::new();
        let mut best_inertia = f64::INFINITY;

        for _ in 0..self.config.n_init {
            let mut centroids = init_centroids(rows, k, &mut rng);
            let mut counts = vec![0usize; k];

            for _ in 0..self.config.max_iterations {
                let mut indices: Vec<usize> = (0..rows.len()).collect();
                indices.shuffle(&mut rng);
                indices.truncate(batch);

                for &i in &indices {
                    let nearest = nearest_centroid(&rows[i], &centroids);
                    counts[nearest] += 1;
                    // Per-centroid learning rate decays with its sample count.
                    let eta = 1.0 / counts[nearest] as f64;
                    for (dim, &value) in rows[i].iter().enumerate() {
                        centroids[nearest][dim] =
                            (1.0 - eta) * centroids[nearest][dim] + eta * value;
                    }
                }
            }

            let inertia = total_inertia(rows, &centroids);
            if inertia < best_inertia {
                best_inertia = inertia;
                best_centroids = centroids;
            }
        }

        rows.iter()
            .map(|row| nearest_centroid(row, &best_centroids))
            .collect()
    }

    /// Collapsed Gibbs sampling; returns each document's argmax topic.
    fn gibbs_lda(&self, counts: &[Vec<u32>], k: usize) -> Vec<usize> {
        let vocab_size = counts.first().map_or(0, |row| row.len());
        if vocab_size == 0 {
            return vec![0; counts.len()];
        }
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        // Expand count rows into flat per-document token lists.
        let docs: Vec<Vec<usize>> = counts
            .iter()
            .map(|row| {
                let mut tokens = Vec::new();
                for (term, &count) in row.iter().enumerate() {
                    for _ in 0..count {
                        tokens.push(term);
                    }
                }
                tokens
            })
            .collect();

        let mut assignments: Vec<Vec<usize>> = docs
            .iter()
            .map(|tokens| tokens.iter().map(|_| rng.gen_range(0..k)).collect())
            .collect();

        let mut doc_topic = vec![vec![0usize; k]; docs.len()];
        let mut topic_term = vec![vec![0usize; vocab_size]; k];
        let mut topic_total = vec![0usize; k];
        for (d, tokens) in docs.iter().enumerate() {
            for (i, &term) in tokens.iter().enumerate() {
                let topic = assignments[d][i];
                doc_topic[d][topic] += 1;
                topic_term[topic][term] += 1;
                topic_total[topic] += 1;
            }
        }

        let alpha = self.config.alpha;
        let beta = self.config.beta;
        let beta_sum = beta * vocab_size as f64;
        let mut weights = vec![0.0f64; k];

        for _ in 0..self.config.lda_sweeps {
            for (d, tokens) in docs.iter().enumerate() {
                for (i, &term) in tokens.iter().enumerate() {
                    let old = assignments[d][i];
                    doc_topic[d][old] -= 1;
                    topic_term[old][term] -= 1;
                    topic_total[old] -= 1;

                    let mut total = 0.0;
                    for (topic, weight) in weights.iter_mut().enumerate() {
                        *weight = (doc_topic[d][topic] as f64 + alpha)
                            * (topic_term[topic][term] as f64 + beta)
                            / (topic_total[topic] as f64 + beta_sum);
                        total += *weight;
                    }

                    let mut draw = rng.gen::<f64>() * total;
                    let mut sampled = k - 1;
                    for (topic, &weight) in weights.iter().enumerate() {
                        if draw < weight {
                            sampled = topic;
                            break;
                        }
                        draw -= weight;
                    }

                    assignments[d][i] = sampled;
                    doc_topic[d][sampled] += 1;
                    topic_term[sampled][term] += 1;
                    topic_total[sampled] += 1;
                }
            }
        }

        doc_topic.iter().map(|row| argmax(row)).collect()
    }
}

impl Default for TopicClusterer {
    fn default() -> Self {
        Self::new()
    }
}

fn init_centroids(rows: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    indices.shuffle(rng);
    indices.truncate(k);
    indices.into_iter().map(|i| rows[i].clone()).collect()
}

fn nearest_centroid(row: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(row, centroid);
        if distance < best_distance {
            best_distance = distance;
            best = i;
        }
    }
    best
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn total_inertia(rows: &[Vec<f64>], centroids: &[Vec<f64>]) -> f64 {
    rows.iter()
        .map(|row| squared_distance(row, &centroids[nearest_centroid(row, centroids)]))
        .sum()
}

fn argmax(row: &[usize]) -> usize {
    let mut best = 0;
    for (i, &value) in row.iter().enumerate() {
        if value > row[best] {
            best = i;
        }
    }
    best
}
