//! Per-item grading results.

use serde::{Deserialize, Serialize};

use crate::model::{Evaluation, Tier};
use crate::traits::TokenUsage;

/// Where an item's reference answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSource {
    /// Written into the answer sheet.
    Sheet,
    /// Generated by the upstream tutor.
    Provider,
    /// Taken from the local reference table.
    Fallback,
    /// The placeholder template for an unknown topic.
    Placeholder,
}

impl std::fmt::Display for ReferenceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceSource::Sheet => write!(f, "sheet"),
            ReferenceSource::Provider => write!(f, "provider"),
            ReferenceSource::Fallback => write!(f, "fallback"),
            ReferenceSource::Placeholder => write!(f, "placeholder"),
        }
    }
}

/// The outcome of grading one sheet item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedItem {
    pub item_id: String,
    #[serde(default)]
    pub topic: String,
    pub question: String,
    pub answer: String,
    pub reference: String,
    pub reference_source: ReferenceSource,
    #[serde(default)]
    pub key_points: Vec<String>,
    pub evaluation: Evaluation,
    #[serde(default)]
    pub expected_tier: Option<Tier>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Tokens spent fetching the reference, if a provider was asked.
    #[serde(default)]
    pub token_usage: Option<TokenUsage>,
    /// Time spent fetching the reference, in milliseconds.
    #[serde(default)]
    pub reference_latency_ms: u64,
}

impl GradedItem {
    pub fn score(&self) -> Option<f64> {
        self.evaluation.score()
    }

    pub fn tier(&self) -> Option<Tier> {
        self.evaluation.tier()
    }

    /// Whether the grade agrees with the hand-assigned tier. `None` when
    /// there is no expected tier or the answer was not graded.
    pub fn matches_expectation(&self) -> Option<bool> {
        let expected = self.expected_tier?;
        self.tier().map(|tier| tier == expected)
    }
}

/// An item that could not be graded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub item_id: String,
    pub error: String,
}
