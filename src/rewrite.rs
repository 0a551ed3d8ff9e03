//! Rewrites context-free multiple-choice stems against their topic.
//!
//! Questions like "Which is correct?" carry no meaning once separated from
//! their option list, so they are restated about the topic they clustered
//! into. Everything else passes through unchanged.

use regex::Regex;

const TEMPLATES: &[(&str, &str)] = &[
    (
        r"^which\s+is\s+correct\??$",
        "Which of the following is correct about {}?",
    ),
    (
        r"^which\s+is\s+not\s+correct\??$",
        "Which of the following is not correct about {}?",
    ),
    (
        r"^which\s+is\s+incorrect\??$",
        "Which of the following is incorrect about {}?",
    ),
    (
        r"^which\s+of\s+the\s+following\s+is\s+correct\??$",
        "Which of the following is correct about {}?",
    ),
    (
        r"^which\s+of\s+the\s+following\s+is\s+not\s+correct\??$",
        "Which of the following is not correct about {}?",
    ),
    (
        r"^which\s+of\s+the\s+following\s+is\s+incorrect\??$",
        "Which of the following is incorrect about {}?",
    ),
    (
        r"^which\s+statement\s+is\s+correct\??$",
        "Which statement is correct about {}?",
    ),
    (
        r"^which\s+statement\s+is\s+not\s+correct\??$",
        "Which statement is not correct about {}?",
    ),
    (
        r"^which\s+statement\s+is\s+incorrect\??$",
        "Which statement is incorrect about {}?",
    ),
    (
        r"^select\s+the\s+correct\s+statement\??$",
        "Select the correct statement about {}",
    ),
    (
        r"^select\s+the\s+incorrect\s+statement\??$",
        "Select the incorrect statement about {}",
    ),
    (
        r"^identify\s+the\s+correct\s+statement\??$",
        "Identify the correct statement about {}",
    ),
    (
        r"^identify\s+the\s+incorrect\s+statement\??$",
        "Identify the incorrect statement about {}",
    ),
];

/// Detects vague stems and anchors them to a topic name.
pub struct QuestionRewriter {
    templates: Vec<(Regex, &'static str)>,
}

impl QuestionRewriter {
    pub fn new() -> Self {
        let templates = TEMPLATES
            .iter()
            .map(|(pattern, template)| {
                (
                    Regex::new(&format!("(?i){}", pattern)).unwrap(),
                    *template,
                )
            })
            .collect();
        Self { templates }
    }

    /// The rewritten question, or the original when it stands on its own.
    pub fn rewrite(&self, question: &str, topic: &str) -> String {
        let trimmed = question.trim();

        for (pattern, template) in &self.templates {
            if pattern.is_match(trimmed) {
                let collapsed = topic.replace(" and ", ", ").replace(" or ", ", ");
                return template.replace("{}", &collapsed);
            }
        }

        let lower = trimmed.to_lowercase();
        if trimmed.split_whitespace().count() <= 5
            && (lower.contains("correct?") || lower.contains("incorrect?"))
        {
            if lower.contains("not correct") || lower.contains("incorrect") {
                return format!("Which of the following is not correct about {}?", topic);
            }
            return format!("Which of the following is correct about {}?", topic);
        }

        question.to_string()
    }
}

impl Default for QuestionRewriter {
    fn default() -> Self {
        Self::new()
    }
}
