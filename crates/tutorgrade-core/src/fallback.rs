//! Local reference answers used when no upstream tutor is reachable.

use serde::{Deserialize, Serialize};

use crate::model::Question;

const BUILTIN_REFERENCES: &[(&str, &str, &[&str])] = &[
    (
        "underwriting",
        "Underwriting is the process insurers use to evaluate risk and decide whether to \
         issue a policy and at what premium.",
        &[
            "Insurers assess the applicant's risk",
            "The assessment decides approval and price",
        ],
    ),
    (
        "deductible",
        "A deductible is the amount the policyholder pays out of pocket before the insurer \
         starts paying a claim.",
        &[
            "Paid by the policyholder first",
            "Higher deductibles usually mean lower premiums",
        ],
    ),
    (
        "premium",
        "A premium is the price the policyholder pays, monthly or annually, to keep an \
         insurance policy in force.",
        &["Payment for coverage", "Priced according to risk"],
    ),
    (
        "claim",
        "A claim is a formal request to the insurer for payment after a covered loss.",
        &["Filed after a loss", "The insurer reviews and settles it"],
    ),
    (
        "diversif",
        "Diversification spreads investments across different assets to reduce risk.",
        &["Spread money across assets", "Losses in one asset are offset by others"],
    ),
    (
        "inflation",
        "Inflation is the general rise in prices over time, which reduces the purchasing \
         power of money.",
        &["Prices rise", "Each unit of currency buys less"],
    ),
];

/// A locally sourced reference answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackReference {
    pub answer: String,
    pub key_points: Vec<String>,
    /// The answer is the placeholder template rather than real content.
    pub placeholder: bool,
}

/// Static reference table keyed by topic substring.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackReferences {
    entries: Vec<(String, FallbackReference)>,
}

impl FallbackReferences {
    pub fn builtin() -> Self {
        let entries = BUILTIN_REFERENCES
            .iter()
            .map(|(key, answer, points)| {
                (
                    key.to_string(),
                    FallbackReference {
                        answer: answer.to_string(),
                        key_points: points.iter().map(|p| p.to_string()).collect(),
                        placeholder: false,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Add an entry that takes priority over existing ones.
    pub fn insert(&mut self, key: &str, answer: &str, key_points: Vec<String>) {
        self.entries.insert(
            0,
            (
                key.to_lowercase(),
                FallbackReference {
                    answer: answer.to_string(),
                    key_points,
                    placeholder: false,
                },
            ),
        );
    }

    /// The first entry whose key occurs in the question's topic or text.
    pub fn lookup(&self, question: &Question) -> Option<&FallbackReference> {
        let haystack = format!("{} {}", question.topic, question.text).to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| haystack.contains(key.as_str()))
            .map(|(_, reference)| reference)
    }

    /// A table entry, or the placeholder template for unknown topics.
    pub fn reference_for(&self, question: &Question) -> FallbackReference {
        self.lookup(question).cloned().unwrap_or_else(|| FallbackReference {
            answer: placeholder_reference(&question.topic, &question.subject),
            key_points: Vec::new(),
            placeholder: true,
        })
    }
}

impl Default for FallbackReferences {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The boilerplate reference used for topics without real content.
pub fn placeholder_reference(topic: &str, subject: &str) -> String {
    let topic = if topic.trim().is_empty() {
        "This topic"
    } else {
        topic.trim()
    };
    let subject = if subject.trim().is_empty() {
        "this subject"
    } else {
        subject.trim()
    };
    format!(
        "{topic} is an important concept in {subject}. Understanding the key principles of \
         {topic} helps you apply it in real situations."
    )
}
