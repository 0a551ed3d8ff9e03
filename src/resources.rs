//! Study-resource suggestions per topic: best-effort video lookup plus
//! curated article links.
//!
//! Video search lives behind [`VideoProvider`] so the pipeline can run
//! offline and tests can observe the queries. Article links favor a
//! verified map of known-good URLs and otherwise fall back to search
//! endpoints, which cannot 404.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::model::{ArticleResource, ResourceBundle, VideoResource};

/// Verified article links keyed by topic substring. First match wins.
const VERIFIED_ARTICLES: &[(&str, &[(&str, &str, &str)])] = &[
    (
        "normalization",
        &[
            (
                "Database Normalization Forms",
                "https://www.geeksforgeeks.org/database-normalization-introduction/",
                "GeeksforGeeks",
            ),
            (
                "DBMS Normalization Guide",
                "https://www.tutorialspoint.com/dbms/database_normalization.htm",
                "TutorialsPoint",
            ),
        ],
    ),
    (
        "sql",
        &[
            (
                "SQL Tutorial",
                "https://www.geeksforgeeks.org/sql-tutorial/",
                "GeeksforGeeks",
            ),
            (
                "SQL Guide",
                "https://www.tutorialspoint.com/sql/index.htm",
                "TutorialsPoint",
            ),
        ],
    ),
    (
        "join",
        &[
            (
                "SQL Joins",
                "https://www.geeksforgeeks.org/sql-join-set-1-inner-left-right-and-full-joins/",
                "GeeksforGeeks",
            ),
            (
                "SQL Joins Tutorial",
                "https://www.tutorialspoint.com/sql/sql-using-joins.htm",
                "TutorialsPoint",
            ),
        ],
    ),
    (
        "relational algebra",
        &[
            (
                "Relational Algebra",
                "https://www.geeksforgeeks.org/introduction-to-relational-algebra-in-dbms/",
                "GeeksforGeeks",
            ),
            (
                "Relational Algebra DBMS",
                "https://www.tutorialspoint.com/dbms/relational_algebra.htm",
                "TutorialsPoint",
            ),
        ],
    ),
    (
        "er model",
        &[
            (
                "ER Model in DBMS",
                "https://www.geeksforgeeks.org/introduction-of-er-model/",
                "GeeksforGeeks",
            ),
            (
                "ER Model Tutorial",
                "https://www.tutorialspoint.com/dbms/er_model_basic_concepts.htm",
                "TutorialsPoint",
            ),
        ],
    ),
    (
        "transaction",
        &[
            (
                "Transaction in DBMS",
                "https://www.geeksforgeeks.org/transaction-in-dbms/",
                "GeeksforGeeks",
            ),
            (
                "DBMS Transaction",
                "https://www.tutorialspoint.com/dbms/database_transaction.htm",
                "TutorialsPoint",
            ),
        ],
    ),
    (
        "indexing",
        &[
            (
                "Indexing in Databases",
                "https://www.geeksforgeeks.org/indexing-in-databases-set-1/",
                "GeeksforGeeks",
            ),
            (
                "DBMS Indexing",
                "https://www.tutorialspoint.com/dbms/dbms_indexing.htm",
                "TutorialsPoint",
            ),
        ],
    ),
    (
        "process scheduling",
        &[
            (
                "CPU Scheduling",
                "https://www.geeksforgeeks.org/cpu-scheduling-in-operating-systems/",
                "GeeksforGeeks",
            ),
            (
                "OS Scheduling Algorithms",
                "https://www.tutorialspoint.com/operating_system/os_process_scheduling.htm",
                "TutorialsPoint",
            ),
        ],
    ),
    (
        "deadlock",
        &[
            (
                "Introduction to Deadlock",
                "https://www.geeksforgeeks.org/introduction-of-deadlock-in-operating-system/",
                "GeeksforGeeks",
            ),
            (
                "OS Deadlock",
                "https://www.tutorialspoint.com/operating_system/os_deadlock.htm",
                "TutorialsPoint",
            ),
        ],
    ),
    (
        "tcp",
        &[
            (
                "TCP/IP Model",
                "https://www.geeksforgeeks.org/tcp-ip-model/",
                "GeeksforGeeks",
            ),
            (
                "Data Communication - TCP/IP",
                "https://www.tutorialspoint.com/data_communication_computer_network/tcp_ip_model.htm",
                "TutorialsPoint",
            ),
        ],
    ),
];

/// Technologies with a W3Schools track.
const W3SCHOOLS_TOPICS: [&str; 6] = ["sql", "html", "css", "js", "python", "java"];

/// External video search backend.
pub trait VideoProvider: Send + Sync {
    /// Up to two results for the query; empty on any failure.
    fn search(&self, query: &str) -> Vec<VideoResource>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Scrapes YouTube's search results page.
pub struct YoutubeProvider {
    agent: ureq::Agent,
}

impl YoutubeProvider {
    pub fn new() -> Self {
        Self {
            agent: ureq::builder().timeout(Duration::from_secs(10)).build(),
        }
    }
}

impl Default for YoutubeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoProvider for YoutubeProvider {
    fn search(&self, query: &str) -> Vec<VideoResource> {
        let response = match self
            .agent
            .get("https://www.youtube.com/results")
            .query("search_query", query)
            .call()
        {
            Ok(response) => response,
            Err(e) => {
                log::debug!("Video search failed: {}", e);
                return Vec::new();
            }
        };
        let body = match response.into_string() {
            Ok(body) => body,
            Err(e) => {
                log::debug!("Video search body unreadable: {}", e);
                return Vec::new();
            }
        };
        parse_search_results(&body)
    }

    fn name(&self) -> &str {
        "youtube"
    }
}

/// Pull up to two video entries out of the embedded `ytInitialData` blob.
fn parse_search_results(body: &str) -> Vec<VideoResource> {
    let marker = "var ytInitialData = ";
    let start = match body.find(marker) {
        Some(i) => i + marker.len(),
        None => return Vec::new(),
    };
    let tail = &body[start..];
    let end = match tail.find(";</script>") {
        Some(i) => i,
        None => return Vec::new(),
    };
    let data: Value = match serde_json::from_str(&tail[..end]) {
        Ok(data) => data,
        Err(_) => return Vec::new(),
    };

    let sections = &data["contents"]["twoColumnSearchResultsRenderer"]["primaryContents"]
        ["sectionListRenderer"]["contents"];
    let mut videos = Vec::new();
    for section in sections.as_array().into_iter().flatten() {
        let items = &section["itemSectionRenderer"]["contents"];
        for item in items.as_array().into_iter().flatten() {
            let renderer = &item["videoRenderer"];
            let video_id = match renderer["videoId"].as_str() {
                Some(id) => id,
                None => continue,
            };
            let title = renderer["title"]["runs"][0]["text"]
                .as_str()
                .unwrap_or("Video Tutorial");
            let thumbnail = renderer["thumbnail"]["thumbnails"][0]["url"]
                .as_str()
                .unwrap_or("");
            let duration = renderer["lengthText"]["simpleText"]
                .as_str()
                .unwrap_or("N/A");

            videos.push(
                VideoResource::new(
                    title,
                    format!("https://www.youtube.com/watch?v={}", video_id),
                )
                .with_thumbnail(thumbnail)
                .with_duration(duration),
            );
            if videos.len() == 2 {
                return videos;
            }
        }
    }
    videos
}

/// Provider for offline runs; finds nothing.
pub struct NoopVideoProvider;

impl VideoProvider for NoopVideoProvider {
    fn search(&self, _query: &str) -> Vec<VideoResource> {
        Vec::new()
    }

    fn name(&self) -> &str {
        "noop"
    }
}

/// Attaches videos and articles to topic names.
pub struct ResourceEnricher {
    provider: Arc<dyn VideoProvider>,
}

impl ResourceEnricher {
    pub fn new(provider: Arc<dyn VideoProvider>) -> Self {
        Self { provider }
    }

    /// Full resource bundle for one topic.
    pub fn enrich(&self, topic: &str) -> ResourceBundle {
        let videos = self.provider.search(&format!("{} lecture tutorial", topic));
        let articles = self.articles(topic);
        ResourceBundle::new(videos, articles)
    }

    /// Article suggestions for a topic; never empty.
    pub fn articles(&self, topic: &str) -> Vec<ArticleResource> {
        let normalized = topic
            .to_lowercase()
            .replace(" and ", " ")
            .replace(',', "")
            .trim()
            .to_string();
        if normalized.is_empty() {
            return generic_articles();
        }

        for (key, entries) in VERIFIED_ARTICLES {
            if normalized.contains(key) {
                return entries
                    .iter()
                    .map(|(title, link, platform)| ArticleResource::new(*title, *link, *platform))
                    .collect();
            }
        }

        let slug = normalized.replace(' ', "-");
        let mut articles = vec![
            ArticleResource::new(
                format!("{} - GeeksforGeeks", topic),
                format!("https://www.geeksforgeeks.org/?s={}", slug),
                "GeeksforGeeks",
            ),
            ArticleResource::new(
                format!("{} - TutorialsPoint", topic),
                format!("https://www.tutorialspoint.com/search/{}", slug),
                "TutorialsPoint",
            ),
        ];
        if W3SCHOOLS_TOPICS.iter().any(|tech| normalized.contains(tech)) {
            articles.push(ArticleResource::new(
                format!("{} - W3Schools", topic),
                "https://www.w3schools.com/",
                "W3Schools",
            ));
        }
        articles
    }
}

/// Broad fallback links for topics with no usable name.
pub fn generic_articles() -> Vec<ArticleResource> {
    vec![
        ArticleResource::new(
            "GeeksforGeeks Computer Science",
            "https://www.geeksforgeeks.org/computer-science-tutorials/",
            "GeeksforGeeks",
        ),
        ArticleResource::new(
            "TutorialsPoint Library",
            "https://www.tutorialspoint.com/tutorialslibrary.htm",
            "TutorialsPoint",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enricher() -> ResourceEnricher {
        ResourceEnricher::new(Arc::new(NoopVideoProvider))
    }

    #[test]
    fn test_verified_map_substring_match() {
        let articles = enricher().articles("Database Normalization");
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Database Normalization Forms");
        assert_eq!(articles[1].platform, "TutorialsPoint");
    }

    #[test]
    fn test_verified_map_order_decides_ties() {
        // Contains both "sql" and "join"; "sql" is declared first.
        let articles = enricher().articles("SQL Joins");
        assert_eq!(articles[0].title, "SQL Tutorial");
    }

    #[test]
    fn test_connectors_collapse_before_lookup() {
        let articles = enricher().articles("Locking and Deadlock Handling");
        assert_eq!(articles[0].title, "Introduction to Deadlock");
    }

    #[test]
    fn test_synthesized_search_links() {
        let articles = enricher().articles("Graph Coloring");
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Graph Coloring - GeeksforGeeks");
        assert_eq!(
            articles[0].link,
            "https://www.geeksforgeeks.org/?s=graph-coloring"
        );
        assert_eq!(
            articles[1].link,
            "https://www.tutorialspoint.com/search/graph-coloring"
        );
    }

    #[test]
    fn test_w3schools_added_for_named_technologies() {
        let articles = enricher().articles("Python Iterators");
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[2].platform, "W3Schools");
        assert_eq!(articles[2].link, "https://www.w3schools.com/");
    }

    #[test]
    fn test_blank_topic_gets_generic_links() {
        let articles = enricher().articles("   ");
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "GeeksforGeeks Computer Science");
    }

    #[test]
    fn test_enrich_empty_bundle_message() {
        // NoopVideoProvider finds nothing, but articles always resolve.
        let bundle = enricher().enrich("Quantum Gates");
        assert!(bundle.videos.is_empty());
        assert_eq!(bundle.total_count, bundle.articles.len());
        assert!(bundle.message.is_none());
    }

    #[test]
    fn test_parse_search_results_extracts_videos() {
        let payload = serde_json::json!({
            "contents": {
                "twoColumnSearchResultsRenderer": {
                    "primaryContents": {
                        "sectionListRenderer": {
                            "contents": [{
                                "itemSectionRenderer": {
                                    "contents": [
                                        {
                                            "videoRenderer": {
                                                "videoId": "abc123",
                                                "title": {"runs": [{"text": "Normalization Lecture"}]},
                                                "thumbnail": {"thumbnails": [{"url": "https://img.example/1.jpg"}]},
                                                "lengthText": {"simpleText": "12:34"}
                                            }
                                        },
                                        {"shelfRenderer": {}},
                                        {
                                            "videoRenderer": {
                                                "videoId": "def456",
                                                "title": {"runs": [{"text": "Second"}]}
                                            }
                                        },
                                        {
                                            "videoRenderer": {
                                                "videoId": "ghi789",
                                                "title": {"runs": [{"text": "Third"}]}
                                            }
                                        }
                                    ]
                                }
                            }]
                        }
                    }
                }
            }
        });
        let body = format!(
            "<script>var ytInitialData = {};</script>",
            payload
        );

        let videos = parse_search_results(&body);
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].title, "Normalization Lecture");
        assert_eq!(videos[0].link, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(videos[0].thumbnail, "https://img.example/1.jpg");
        assert_eq!(videos[0].duration, "12:34");
        assert_eq!(videos[1].title, "Second");
        assert_eq!(videos[1].duration, "N/A");
    }

    #[test]
    fn test_parse_search_results_tolerates_garbage() {
        assert!(parse_search_results("<html>nothing here</html>").is_empty());
        assert!(parse_search_results("var ytInitialData = {broken;</script>").is_empty());
    }
}
