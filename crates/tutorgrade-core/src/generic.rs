//! Detection of placeholder reference answers and the domain-term override.
//!
//! A placeholder reference ("X is an important concept in Y. Understanding
//! the key principles of X...") says nothing about X, so matching against it
//! is meaningless. Instead the answer is checked for vocabulary that a good
//! answer about the topic would use, and enough of it sets a score floor.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::GenericOverride;
use crate::lexicon::{SynonymTable, TopicTermTable};
use crate::text::contains_phrase;

/// Phrase groups that mark a placeholder. A reference is generic when it
/// contains every phrase of any one group.
const MARKER_GROUPS: &[&[&str]] = &[
    &["important concept", "key principles"],
    &["fundamental concept", "key principles"],
    &["important concept", "understanding"],
    &["no reference answer available"],
];

static TOPIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:what\s+(?:is|are)|define|explain|describe)\s+(?:an?\s+|the\s+)?(.+?)\s*[.?!]*\s*$",
    )
    .expect("topic pattern is valid")
});

/// Pull the subject of a definition question, lowercased.
///
/// `"What is Risk Management?"` gives `"risk management"`. Returns `None`
/// for questions that are not phrased as a definition.
pub fn extract_topic(question: &str) -> Option<String> {
    TOPIC_PATTERN
        .captures(question)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase())
}

/// Outcome of checking an answer against a placeholder reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericAssessment {
    /// The topic the term list was chosen for.
    pub topic: String,
    pub matched_terms: Vec<String>,
    /// Score floor earned, if any.
    pub floor: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenericAnswerDetector {
    rules: GenericOverride,
}

impl GenericAnswerDetector {
    pub fn new(rules: GenericOverride) -> Self {
        Self { rules }
    }

    /// Whether a normalized reference is a placeholder.
    pub fn is_generic(&self, reference: &str) -> bool {
        MARKER_GROUPS
            .iter()
            .any(|group| group.iter().all(|phrase| reference.contains(phrase)))
    }

    /// Count topic vocabulary in a normalized answer and derive the floor.
    ///
    /// A term counts when it appears as a whole word or phrase, starts a
    /// token, or is a synonym of a token.
    pub fn assess(
        &self,
        question: &str,
        topic: &str,
        answer: &str,
        conceptual: f64,
        topic_terms: &TopicTermTable,
        synonyms: &SynonymTable,
    ) -> GenericAssessment {
        let topic_lower = topic.to_lowercase();
        let extracted = extract_topic(question).unwrap_or_else(|| topic_lower.clone());
        let haystack = format!("{extracted} {topic_lower}");
        let tokens: Vec<&str> = answer.split_whitespace().collect();

        let matched_terms: Vec<String> = topic_terms
            .candidates(&haystack)
            .into_iter()
            .filter(|term| {
                contains_phrase(answer, term)
                    || tokens
                        .iter()
                        .any(|t| t.starts_with(term) || synonyms.are_linked(t, term))
            })
            .map(str::to_string)
            .collect();

        let floor = self.rules.floor(matched_terms.len(), conceptual);
        GenericAssessment {
            topic: extracted,
            matched_terms,
            floor,
        }
    }
}
