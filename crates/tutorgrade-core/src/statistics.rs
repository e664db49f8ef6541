//! Aggregate statistics over a graded sheet.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Tier;
use crate::results::{GradedItem, ReferenceSource};

/// Number of graded items in each tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub correct: usize,
    pub partially_correct: usize,
    pub incorrect: usize,
}

impl TierCounts {
    pub fn record(&mut self, tier: Tier) {
        match tier {
            Tier::Correct => self.correct += 1,
            Tier::PartiallyCorrect => self.partially_correct += 1,
            Tier::Incorrect => self.incorrect += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.correct + self.partially_correct + self.incorrect
    }

    pub fn credited(&self) -> usize {
        self.correct + self.partially_correct
    }
}

/// Statistics for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicStats {
    pub topic: String,
    /// Graded items (retries excluded).
    pub graded: usize,
    pub mean_score: f64,
    pub credit_rate: f64,
}

/// Agreement between grades and hand-assigned tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgreementStats {
    pub checked: usize,
    pub agreed: usize,
    pub rate: f64,
}

/// Aggregate statistics across all items of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Items that produced an evaluation (graded or retry).
    pub evaluated: usize,
    /// Empty answers that got a retry prompt.
    pub retries: usize,
    /// Items that failed with an error.
    pub failed: usize,
    pub tiers: TierCounts,
    /// Mean score over graded items.
    pub mean_score: f64,
    /// Share of graded items earning credit.
    pub credit_rate: f64,
    pub per_topic: BTreeMap<String, TopicStats>,
    pub reference_sources: BTreeMap<ReferenceSource, usize>,
    #[serde(default)]
    pub agreement: Option<AgreementStats>,
    pub total_tokens: u64,
    pub total_cost_usd: f64,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn rate(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Compute aggregate statistics from graded items.
pub fn compute_aggregate_stats(items: &[GradedItem], failed: usize) -> AggregateStats {
    let mut tiers = TierCounts::default();
    let mut scores = Vec::new();
    let mut retries = 0usize;
    let mut topics: BTreeMap<String, (Vec<f64>, TierCounts)> = BTreeMap::new();
    let mut reference_sources: BTreeMap<ReferenceSource, usize> = BTreeMap::new();

    for item in items {
        *reference_sources.entry(item.reference_source).or_default() += 1;
        match item.evaluation.graded() {
            Some(result) => {
                tiers.record(result.tier);
                scores.push(result.score);
                let topic = if item.topic.is_empty() {
                    "(none)".to_string()
                } else {
                    item.topic.clone()
                };
                let entry = topics.entry(topic).or_default();
                entry.0.push(result.score);
                entry.1.record(result.tier);
            }
            None => retries += 1,
        }
    }

    let per_topic = topics
        .into_iter()
        .map(|(topic, (topic_scores, counts))| {
            let stats = TopicStats {
                topic: topic.clone(),
                graded: counts.total(),
                mean_score: mean(&topic_scores),
                credit_rate: rate(counts.credited(), counts.total()),
            };
            (topic, stats)
        })
        .collect();

    let checks: Vec<bool> = items.iter().filter_map(|i| i.matches_expectation()).collect();
    let agreement = (!checks.is_empty()).then(|| {
        let agreed = checks.iter().filter(|ok| **ok).count();
        AgreementStats {
            checked: checks.len(),
            agreed,
            rate: rate(agreed, checks.len()),
        }
    });

    let total_tokens = items
        .iter()
        .filter_map(|i| i.token_usage.as_ref())
        .map(|u| u.total_tokens as u64)
        .sum();
    let total_cost_usd = items
        .iter()
        .filter_map(|i| i.token_usage.as_ref())
        .map(|u| u.estimated_cost_usd)
        .sum();

    AggregateStats {
        evaluated: items.len(),
        retries,
        failed,
        tiers,
        mean_score: mean(&scores),
        credit_rate: rate(tiers.credited(), tiers.total()),
        per_topic,
        reference_sources,
        agreement,
        total_tokens,
        total_cost_usd,
    }
}
