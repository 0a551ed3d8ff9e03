//! Display names for question clusters.
//!
//! Labels come from the most frequent member-question tokens, expanded
//! through a static abbreviation table. Ambiguous single-letter tokens
//! resolve through context rules scanned against the whole cluster
//! vocabulary.

use std::collections::{HashMap, HashSet};

/// Abbreviation and keyword expansions, keyed by lowercased token.
const EXPANSIONS: &[(&str, &str)] = &[
    ("q", "Question"),
    ("r", "Relation"),
    ("w", "Write"),
    ("s", "Statement"),
    ("p", "Program"),
    ("n", "Number"),
    ("er", "Entity-Relationship"),
    ("os", "Operating System"),
    ("cpu", "Central Processing Unit"),
    ("ram", "Random Access Memory"),
    ("rom", "Read Only Memory"),
    ("io", "Input Output"),
    ("api", "Application Programming Interface"),
    ("ui", "User Interface"),
    ("ux", "User Experience"),
    ("html", "HyperText Markup Language"),
    ("css", "Cascading Style Sheets"),
    ("xml", "Extensible Markup Language"),
    ("json", "JavaScript Object Notation"),
    ("http", "HyperText Transfer Protocol"),
    ("tcp", "Transmission Control Protocol"),
    ("udp", "User Datagram Protocol"),
    ("ip", "Internet Protocol"),
    ("dns", "Domain Name System"),
    ("url", "Uniform Resource Locator"),
    ("uri", "Uniform Resource Identifier"),
    ("database", "Database Management Systems"),
    ("dbms", "Database Management Systems"),
    ("rdbms", "Relational Database Management Systems"),
    ("sql", "Structured Query Language"),
    ("nosql", "Non-Relational Database"),
    ("normalization", "Database Normalization"),
    ("entity", "Entity-Relationship Model"),
    ("relationship", "Entity-Relationship Model"),
    ("query", "Query Processing"),
    ("queries", "Query Processing"),
    ("transaction", "Transaction Management"),
    ("concurrency", "Concurrency Control"),
    ("indexing", "Database Indexing"),
    ("schema", "Database Schema Design"),
    ("acid", "Atomicity Consistency Isolation Durability"),
    ("design", "System Design"),
    ("algorithm", "Algorithm Design and Analysis"),
    ("algorithms", "Algorithm Design and Analysis"),
    ("structure", "Data Structures"),
    ("structures", "Data Structures"),
    ("programming", "Programming Fundamentals"),
    ("oop", "Object-Oriented Programming"),
    ("oops", "Object-Oriented Programming"),
    ("functional", "Functional Programming"),
    ("network", "Computer Networks"),
    ("networking", "Computer Networks"),
    ("operating", "Operating Systems"),
    ("system", "System Architecture"),
    ("systems", "System Architecture"),
    ("compiler", "Compiler Design"),
    ("parsing", "Parsing Techniques"),
    ("processor", "Processor Architecture"),
    ("memory", "Memory Management"),
    ("software", "Software Engineering"),
    ("engineering", "Software Engineering"),
    ("testing", "Software Testing"),
    ("debugging", "Debugging Techniques"),
    ("development", "Software Development"),
    ("agile", "Agile Methodology"),
    ("scrum", "Scrum Framework"),
    ("security", "Information Security"),
    ("encryption", "Cryptography and Encryption"),
    ("cryptography", "Cryptography and Encryption"),
    ("authentication", "Authentication and Authorization"),
    ("machine", "Machine Learning"),
    ("learning", "Machine Learning"),
    ("intelligence", "Artificial Intelligence"),
    ("artificial", "Artificial Intelligence"),
    ("neural", "Neural Networks"),
    ("deep", "Deep Learning"),
    ("web", "Web Technologies"),
    ("cloud", "Cloud Computing"),
    ("computing", "Cloud Computing"),
    ("distributed", "Distributed Systems"),
    ("parallel", "Parallel Computing"),
    ("blockchain", "Blockchain Technology"),
    ("iot", "Internet of Things"),
];

struct ContextRule {
    token: &'static str,
    default: &'static str,
    overrides: &'static [(&'static [&'static str], &'static str)],
}

/// Rules for tokens whose meaning depends on surrounding vocabulary.
/// Overrides are scanned in order; the first with any context word present
/// in the cluster wins.
const CONTEXT_RULES: &[ContextRule] = &[
    ContextRule {
        token: "m",
        default: "Method",
        overrides: &[
            (&["matrix", "matrices", "linear"], "Matrix"),
            (&["memory", "ram", "storage"], "Memory"),
            (&["model", "modeling"], "Model"),
            (&["module", "component"], "Module"),
            (&["method", "function"], "Method"),
            (&["management", "manager"], "Management"),
            (&["machine", "learning"], "Machine"),
        ],
    },
    ContextRule {
        token: "j",
        default: "Join",
        overrides: &[
            (&["join", "joins", "sql", "query"], "Join"),
            (&["java", "programming"], "Java"),
            (&["json", "data"], "JSON"),
            (&["job", "scheduling", "process"], "Job"),
        ],
    },
    ContextRule {
        token: "write",
        default: "Write",
        overrides: &[
            (&["query", "sql", "select"], "Write Query"),
            (&["program", "code", "function"], "Write Program"),
            (&["algorithm", "pseudo"], "Write Algorithm"),
            (&["explain", "describe"], "Write Explanation"),
        ],
    },
    ContextRule {
        token: "k",
        default: "Key",
        overrides: &[
            (&["key", "primary", "foreign"], "Key"),
            (&["means", "cluster"], "K-Means"),
            (&["nearest", "neighbor"], "K-Nearest"),
        ],
    },
    ContextRule {
        token: "b",
        default: "Binary",
        overrides: &[
            (&["tree", "search", "sort"], "Binary"),
            (&["boolean", "logic"], "Boolean"),
            (&["byte", "data"], "Byte"),
        ],
    },
    ContextRule {
        token: "t",
        default: "Table",
        overrides: &[
            (&["table", "database", "relation"], "Table"),
            (&["tree", "node", "graph"], "Tree"),
            (&["time", "complexity"], "Time"),
            (&["transaction", "acid"], "Transaction"),
            (&["test", "testing"], "Test"),
        ],
    },
    ContextRule {
        token: "c",
        default: "Class",
        overrides: &[
            (&["class", "object", "oop"], "Class"),
            (&["code", "program"], "Code"),
            (&["complexity", "algorithm"], "Complexity"),
            (&["compiler", "parse"], "Compiler"),
            (&["cache", "memory"], "Cache"),
        ],
    },
    ContextRule {
        token: "d",
        default: "Data",
        overrides: &[
            (&["data", "structure"], "Data"),
            (&["database", "dbms"], "Database"),
            (&["diagram", "model"], "Diagram"),
            (&["design", "pattern"], "Design"),
        ],
    },
    ContextRule {
        token: "e",
        default: "Entity",
        overrides: &[
            (&["entity", "relationship", "er"], "Entity"),
            (&["error", "exception"], "Error"),
            (&["encryption", "security"], "Encryption"),
        ],
    },
    ContextRule {
        token: "f",
        default: "Function",
        overrides: &[
            (&["function", "method", "call"], "Function"),
            (&["file", "system", "directory"], "File"),
            (&["foreign", "key"], "Foreign"),
        ],
    },
];

/// Names clusters from their member questions.
pub struct TopicLabeler;

impl TopicLabeler {
    pub fn new() -> Self {
        Self
    }

    /// Display name for one cluster. `display_id` is the 1-based topic
    /// number used when no meaningful tokens survive.
    pub fn label(&self, members: &[&str], display_id: usize) -> String {
        let joined = members.join(" ").to_lowercase();
        let vocabulary: HashSet<&str> = joined.split_whitespace().collect();

        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for token in joined.split_whitespace() {
            if !token.chars().all(|c| c.is_alphabetic()) {
                continue;
            }
            if token.chars().count() <= 3 && !in_tables(token) {
                continue;
            }
            match counts.get_mut(token) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(token, 1);
                    order.push(token);
                }
            }
        }

        // Stable sort keeps first-encountered order among equal counts.
        let mut ranked = order;
        ranked.sort_by(|a, b| {
            let ca = counts.get(a).copied().unwrap_or(0);
            let cb = counts.get(b).copied().unwrap_or(0);
            cb.cmp(&ca)
        });
        ranked.truncate(5);

        let mut phrases: Vec<String> = Vec::new();
        for token in ranked {
            let phrase = resolve(token, &vocabulary);
            if !phrases.contains(&phrase) {
                phrases.push(phrase);
            }
        }

        match phrases.len() {
            0 => format!("General Topic {}", display_id),
            1 => phrases[0].clone(),
            2 => format!("{} and {}", phrases[0], phrases[1]),
            _ => format!("{}, {} and {}", phrases[0], phrases[1], phrases[2]),
        }
    }
}

impl Default for TopicLabeler {
    fn default() -> Self {
        Self::new()
    }
}

fn in_tables(token: &str) -> bool {
    EXPANSIONS.iter().any(|(key, _)| *key == token)
        || CONTEXT_RULES.iter().any(|rule| rule.token == token)
}

fn resolve(token: &str, vocabulary: &HashSet<&str>) -> String {
    if let Some(rule) = CONTEXT_RULES.iter().find(|rule| rule.token == token) {
        for (contexts, phrase) in rule.overrides {
            if contexts.iter().any(|context| vocabulary.contains(context)) {
                return phrase.to_string();
            }
        }
        return rule.default.to_string();
    }
    if let Some((_, phrase)) = EXPANSIONS.iter().find(|(key, _)| *key == token) {
        return phrase.to_string();
    }
    title_case(token)
}

fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
