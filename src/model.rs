//! Report data model: topics, ranked questions, resources, and summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Importance tier assigned to a question from its frequency rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImportanceTier {
    /// Lowest frequency-rank third.
    Standard,
    /// Middle frequency-rank third.
    Important,
    /// Highest frequency-rank third.
    Critical,
}

impl std::fmt::Display for ImportanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportanceTier::Standard => write!(f, "Standard"),
            ImportanceTier::Important => write!(f, "Important"),
            ImportanceTier::Critical => write!(f, "Critical"),
        }
    }
}

/// A video study resource for a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoResource {
    /// Video title.
    pub title: String,

    /// Watch URL.
    pub link: String,

    /// Thumbnail URL, empty when unknown.
    pub thumbnail: String,

    /// Duration label, "N/A" when unknown.
    pub duration: String,
}

impl VideoResource {
    /// Create a video resource with placeholder thumbnail and duration.
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            thumbnail: String::new(),
            duration: "N/A".to_string(),
        }
    }

    /// Set the thumbnail URL.
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = thumbnail.into();
        self
    }

    /// Set the duration label.
    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }
}

impl Default for VideoResource {
    fn default() -> Self {
        Self::new("Video Tutorial", "#")
    }
}

/// An article or tutorial link for a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleResource {
    /// Article title.
    pub title: String,

    /// Article URL.
    pub link: String,

    /// Hosting platform name (e.g. "GeeksforGeeks").
    pub platform: String,
}

impl ArticleResource {
    /// Create an article resource.
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            platform: platform.into(),
        }
    }
}

/// All study resources attached to one topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceBundle {
    /// Video resources, possibly empty.
    pub videos: Vec<VideoResource>,

    /// Article resources, possibly empty.
    pub articles: Vec<ArticleResource>,

    /// Combined count of videos and articles.
    pub total_count: usize,

    /// Present only when the bundle is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ResourceBundle {
    /// Bundle videos and articles, deriving the count and the
    /// empty-bundle message.
    pub fn new(videos: Vec<VideoResource>, articles: Vec<ArticleResource>) -> Self {
        let total_count = videos.len() + articles.len();
        let message = if total_count == 0 {
            Some("No resources found for this topic".to_string())
        } else {
            None
        };
        Self {
            videos,
            articles,
            total_count,
            message,
        }
    }

    /// An empty bundle carrying the not-found message.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

/// A question as it appears in the report, after rewriting and ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedQuestion {
    /// Question text, possibly rewritten from a vague stem.
    pub text: String,

    /// Assigned importance tier.
    pub importance: ImportanceTier,

    /// Occurrences of the identical question across the corpus.
    pub frequency: usize,
}

impl RankedQuestion {
    /// Create a ranked question.
    pub fn new(text: impl Into<String>, importance: ImportanceTier, frequency: usize) -> Self {
        Self {
            text: text.into(),
            importance,
            frequency,
        }
    }
}

/// One topic group in the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// 1-based topic identifier.
    pub topic_id: usize,

    /// Human-readable topic name.
    #[serde(rename = "topic")]
    pub name: String,

    /// Up to ten questions, highest frequency first.
    pub questions: Vec<RankedQuestion>,

    /// Study resources for the topic.
    pub resources: ResourceBundle,
}

/// Per-tier question counts over the emitted questions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierBreakdown {
    pub critical: usize,
    pub important: usize,
    pub standard: usize,
}

impl TierBreakdown {
    /// Tally the emitted questions of every topic.
    pub fn tally(topics: &[Topic]) -> Self {
        let mut breakdown = Self::default();
        for question in topics.iter().flat_map(|t| t.questions.iter()) {
            match question.importance {
                ImportanceTier::Critical => breakdown.critical += 1,
                ImportanceTier::Important => breakdown.important += 1,
                ImportanceTier::Standard => breakdown.standard += 1,
            }
        }
        breakdown
    }
}

/// Aggregate statistics over the whole report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Count of deduplicated questions that entered the analysis.
    pub total_questions_analyzed: usize,

    /// Count of non-empty topics.
    pub number_of_topics: usize,

    /// "Complete" when at least one topic was produced.
    pub analysis_status: String,

    /// Sum of resource counts across topics.
    pub total_resources_found: usize,

    /// Questions per topic, rounded to one decimal.
    pub average_questions_per_topic: f64,

    /// Tier counts over the emitted questions.
    pub classification_breakdown: TierBreakdown,
}

impl Summary {
    /// Derive the summary from the assembled topics.
    pub fn from_topics(total_questions: usize, topics: &[Topic]) -> Self {
        let total_resources_found = topics.iter().map(|t| t.resources.total_count).sum();
        let average = if topics.is_empty() {
            0.0
        } else {
            total_questions as f64 / topics.len() as f64
        };
        let analysis_status = if topics.is_empty() {
            "Incomplete"
        } else {
            "Complete"
        };
        Self {
            total_questions_analyzed: total_questions,
            number_of_topics: topics.len(),
            analysis_status: analysis_status.to_string(),
            total_resources_found,
            average_questions_per_topic: (average * 10.0).round() / 10.0,
            classification_breakdown: TierBreakdown::tally(topics),
        }
    }
}

/// The full analysis report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Count of deduplicated questions that entered the analysis.
    pub total_questions: usize,

    /// Count of non-empty topics.
    pub topics_found: usize,

    /// Topic groups in cluster order.
    pub analysis: Vec<Topic>,

    /// Aggregate statistics.
    pub summary: Summary,

    /// Report creation time (UTC).
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Assemble a report from topics, deriving counts and the summary.
    pub fn new(total_questions: usize, analysis: Vec<Topic>) -> Self {
        let summary = Summary::from_topics(total_questions, &analysis);
        Self {
            total_questions,
            topics_found: analysis.len(),
            analysis,
            summary,
            generated_at: Utc::now(),
        }
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
