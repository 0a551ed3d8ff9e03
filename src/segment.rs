//! Question segmentation: raw document text to candidate question strings.
//!
//! A question block is one starter line (numbered, `Q`-prefixed, or beginning
//! with an interrogative verb) plus its continuation lines, which keeps
//! wrapped text and diagram references attached to the question they belong
//! to.

use std::collections::HashMap;

use regex::Regex;

/// Cap applied to the deduplicated question list.
pub const DEFAULT_MAX_QUESTIONS: usize = 200;

/// Verbs that open a question when no numbering marker is present.
const QUESTION_STARTERS: [&str; 16] = [
    "explain", "define", "what", "why", "how", "describe", "discuss", "compare", "analyze",
    "evaluate", "list", "state", "write", "derive", "prove", "solve",
];

/// Splits extracted text into question candidates.
pub struct QuestionSegmenter {
    start_patterns: Vec<Regex>,
    numeric_marker: Regex,
    q_marker: Regex,
    word_marker: Regex,
}

impl QuestionSegmenter {
    pub fn new() -> Self {
        Self {
            start_patterns: vec![
                Regex::new(r"(?i)^\d+[.)]\s+(.+)").unwrap(),
                Regex::new(r"(?i)^Q\d+[:.]\s+(.+)").unwrap(),
                Regex::new(r"(?i)^Question\s+\d+[:.]\s+(.+)").unwrap(),
            ],
            numeric_marker: Regex::new(r"^\d+[.)]\s+").unwrap(),
            q_marker: Regex::new(r"^Q\d+[:.]\s+").unwrap(),
            word_marker: Regex::new(r"(?i)^Question\s+\d+[:.]\s+").unwrap(),
        }
    }

    /// Flushed question blocks in document order, before deduplication.
    ///
    /// Duplicates are preserved here so the caller can count how often a
    /// question recurs across papers.
    pub fn candidates(&self, text: &str) -> Vec<String> {
        let mut questions: Vec<String> = Vec::new();
        let mut current: Vec<String> = Vec::new();

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            let mut start: Option<String> = None;
            for pattern in &self.start_patterns {
                if let Some(captures) = pattern.captures(line) {
                    let body = captures.get(1).map_or(line, |m| m.as_str());
                    start = Some(body.to_string());
                    break;
                }
            }
            if start.is_none() {
                let line_lower = line.to_lowercase();
                // Markdown diagram references can begin with a starter verb
                // in their OCR caption; they are continuations, not starts.
                if !line_lower.contains("![diagram]")
                    && QUESTION_STARTERS.iter().any(|s| line_lower.starts_with(s))
                {
                    start = Some(line.to_string());
                }
            }

            match start {
                Some(clean_line) => {
                    flush(&mut current, &mut questions);
                    let stripped = self.strip_markers(&clean_line);
                    current.push(stripped.trim().to_string());
                }
                None => {
                    // Preamble before the first starter is dropped.
                    if current.is_empty() {
                        continue;
                    }
                    if line.chars().count() < 3 && !line.contains("![Diagram]") {
                        continue;
                    }
                    current.push(line.to_string());
                }
            }
        }
        flush(&mut current, &mut questions);

        questions
    }

    /// Deduplicated question list, capped at [`DEFAULT_MAX_QUESTIONS`].
    pub fn segment(&self, text: &str) -> Vec<String> {
        let (questions, _) = self.dedup_questions(&self.candidates(text), DEFAULT_MAX_QUESTIONS);
        questions
    }

    /// Degraded candidate list for text where no question block was found:
    /// every line longer than 15 characters, in order.
    pub fn fallback_lines(&self, text: &str, limit: usize) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| line.chars().count() > 15)
            .take(limit)
            .map(str::to_string)
            .collect()
    }

    /// Deduplicate candidates preserving first-seen order, capped at `limit`.
    ///
    /// The second vector holds, for each kept question, how many times it
    /// occurred across all candidates.
    pub fn dedup_questions(
        &self,
        candidates: &[String],
        limit: usize,
    ) -> (Vec<String>, Vec<usize>) {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for candidate in candidates {
            match counts.get_mut(candidate.as_str()) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(candidate.as_str(), 1);
                    order.push(candidate.clone());
                }
            }
        }
        order.truncate(limit);

        let frequencies = order
            .iter()
            .map(|q| counts.get(q.as_str()).copied().unwrap_or(1))
            .collect();
        (order, frequencies)
    }

    fn strip_markers(&self, line: &str) -> String {
        let stripped = self.numeric_marker.replace(line, "");
        let stripped = self.q_marker.replace(&stripped, "");
        let stripped = self.word_marker.replace(&stripped, "");
        stripped.to_string()
    }
}

impl Default for QuestionSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

fn flush(current: &mut Vec<String>, questions: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    let full = current.join(" ").trim().to_string();
    if full.chars().count() > 10 {
        questions.push(full);
    }
    current.clear();
}
