//! Bag-of-terms features over short question texts.
//!
//! A fitted [`Vectorizer`] holds the corpus vocabulary (most frequent terms
//! after stop-word removal) and produces either raw count rows or
//! tf-idf-weighted, L2-normalized rows over that vocabulary.

use std::collections::{HashMap, HashSet};

use regex::Regex;

/// English stop words excluded from the vocabulary.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst",
    "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway",
    "anywhere", "are", "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being", "below", "beside",
    "besides", "between", "beyond", "bill", "both", "bottom", "but", "by", "call", "can",
    "cannot", "cant", "co", "con", "could", "couldnt", "cry", "de", "describe", "detail", "do",
    "done", "down", "due", "during", "each", "eg", "eight", "either", "eleven", "else",
    "elsewhere", "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire", "first", "five",
    "for", "former", "formerly", "forty", "found", "four", "from", "front", "full", "further",
    "get", "give", "go", "had", "has", "hasnt", "have", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him", "himself", "his",
    "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest", "into",
    "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least", "less", "ltd",
    "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more", "moreover",
    "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely", "neither",
    "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed",
    "seeming", "seems", "serious", "several", "she", "should", "show", "side", "since",
    "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than", "that", "the",
    "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "thick", "thin", "third", "this",
    "those", "though", "three", "through", "throughout", "thru", "thus", "to", "together",
    "too", "top", "toward", "towards", "twelve", "twenty", "two", "un", "under", "until", "up",
    "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
    "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon",
    "wherever", "whether", "which", "while", "whither", "who", "whoever", "whole", "whom",
    "whose", "why", "will", "with", "within", "without", "would", "yet", "you", "your",
    "yours", "yourself", "yourselves",
];

/// Vocabulary-backed term counter for a fixed corpus.
pub struct Vectorizer {
    vocabulary: Vec<String>,
    index: HashMap<String, usize>,
    token_pattern: Regex,
}

impl Vectorizer {
    /// Fit a vocabulary of at most `max_features` terms, ordered by corpus
    /// frequency with alphabetic tie-breaking.
    pub fn fit(corpus: &[String], max_features: usize) -> Self {
        let token_pattern = Regex::new(r"\b\w\w+\b").unwrap();
        let stop: HashSet<&str> = STOP_WORDS.iter().copied().collect();

        let mut totals: HashMap<String, usize> = HashMap::new();
        for doc in corpus {
            for token in tokens(&token_pattern, doc) {
                if stop.contains(token.as_str()) {
                    continue;
                }
                *totals.entry(token).or_insert(0) += 1;
            }
        }

        let mut terms: Vec<(String, usize)> = totals.into_iter().collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        terms.truncate(max_features);

        let vocabulary: Vec<String> = terms.into_iter().map(|(term, _)| term).collect();
        let index = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();

        Self {
            vocabulary,
            index,
            token_pattern,
        }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Raw term counts per document over the fitted vocabulary.
    pub fn count_rows(&self, corpus: &[String]) -> Vec<Vec<u32>> {
        corpus
            .iter()
            .map(|doc| {
                let mut row = vec![0u32; self.vocabulary.len()];
                for token in tokens(&self.token_pattern, doc) {
                    if let Some(&i) = self.index.get(&token) {
                        row[i] += 1;
                    }
                }
                row
            })
            .collect()
    }

    /// Term frequency scaled by smoothed inverse document frequency,
    /// rows L2-normalized. `idf = ln((1 + n) / (1 + df)) + 1`.
    pub fn tfidf_rows(&self, corpus: &[String]) -> Vec<Vec<f64>> {
        let counts = self.count_rows(corpus);
        let n = corpus.len() as f64;

        let mut document_frequency = vec![0usize; self.vocabulary.len()];
        for row in &counts {
            for (term, &count) in row.iter().enumerate() {
                if count > 0 {
                    document_frequency[term] += 1;
                }
            }
        }
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        counts
            .into_iter()
            .map(|row| {
                let mut weighted: Vec<f64> = row
                    .iter()
                    .zip(&idf)
                    .map(|(&count, &idf)| count as f64 * idf)
                    .collect();
                let norm = weighted.iter().map(|v| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for value in &mut weighted {
                        *value /= norm;
                    }
                }
                weighted
            })
            .collect()
    }
}

fn tokens(pattern: &Regex, text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    pattern
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}
