//! Scoring configuration.
//!
//! Every weight and threshold the evaluator uses lives here so it can be tuned
//! from a `[scoring]` table in `tutorgrade.toml` and tested on its own.

use serde::{Deserialize, Serialize};

use crate::error::EvaluationError;
use crate::model::{SignalScores, Tier};

const SUM_TOLERANCE: f64 = 1e-6;

/// Weights of the five signals in the aggregate score. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    pub semantic: f64,
    pub conceptual: f64,
    pub multi_part: f64,
    pub direct: f64,
    pub jaccard: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            semantic: 0.25,
            conceptual: 0.25,
            multi_part: 0.15,
            direct: 0.15,
            jaccard: 0.20,
        }
    }
}

impl SignalWeights {
    pub fn sum(&self) -> f64 {
        self.semantic + self.conceptual + self.multi_part + self.direct + self.jaccard
    }

    /// Weighted sum of the signals.
    pub fn combine(&self, signals: &SignalScores) -> f64 {
        self.semantic * signals.semantic
            + self.conceptual * signals.conceptual
            + self.multi_part * signals.multi_part
            + self.direct * signals.direct
            + self.jaccard * signals.jaccard
    }
}

/// Score cutoffs for the tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    /// Scores at or above this are `correct`.
    pub correct: f64,
    /// Scores at or above this (and below `correct`) are `partially_correct`.
    pub partially_correct: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            correct: 0.80,
            partially_correct: 0.60,
        }
    }
}

impl TierThresholds {
    pub fn classify(&self, score: f64) -> Tier {
        if score >= self.correct {
            Tier::Correct
        } else if score >= self.partially_correct {
            Tier::PartiallyCorrect
        } else {
            Tier::Incorrect
        }
    }
}

/// Positional split of content terms into subject/action/object buckets and
/// the weight of each bucket in the semantic score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleSplit {
    /// Share of terms treated as subjects.
    pub subjects: f64,
    /// Share of terms treated as actions. Objects take the remainder.
    pub actions: f64,
    pub subject_weight: f64,
    pub action_weight: f64,
    pub object_weight: f64,
}

impl Default for RoleSplit {
    fn default() -> Self {
        Self {
            subjects: 0.3,
            actions: 0.3,
            subject_weight: 0.3,
            action_weight: 0.3,
            object_weight: 0.4,
        }
    }
}

/// Blend of concept coverage and depth into the conceptual score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConceptBlend {
    pub coverage: f64,
    pub depth: f64,
}

impl Default for ConceptBlend {
    fn default() -> Self {
        Self {
            coverage: 0.4,
            depth: 0.6,
        }
    }
}

/// Score floors applied when the reference answer is a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericOverride {
    /// Matched domain terms needed for `min_score`.
    pub min_terms: usize,
    pub min_score: f64,
    /// Matched domain terms needed for `strong_score`.
    pub strong_terms: usize,
    /// A conceptual score above this also earns `strong_score`.
    pub strong_conceptual: f64,
    pub strong_score: f64,
}

impl Default for GenericOverride {
    fn default() -> Self {
        Self {
            min_terms: 2,
            min_score: 0.85,
            strong_terms: 4,
            strong_conceptual: 0.7,
            strong_score: 0.95,
        }
    }
}

impl GenericOverride {
    /// The score floor earned by `matched` domain terms, if any.
    pub fn floor(&self, matched: usize, conceptual: f64) -> Option<f64> {
        if matched >= self.strong_terms || conceptual > self.strong_conceptual {
            Some(self.strong_score)
        } else if matched >= self.min_terms {
            Some(self.min_score)
        } else {
            None
        }
    }
}

/// Configuration for the answer evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: SignalWeights,
    pub tiers: TierThresholds,
    pub roles: RoleSplit,
    pub concepts: ConceptBlend,
    pub generic: GenericOverride,
    /// Fuzzy similarity at or above which two terms match.
    pub fuzzy_threshold: f64,
    /// Shortest token (in characters) that counts as a content term.
    pub min_term_len: usize,
    /// Clauses scoring below this are listed as weak in feedback.
    pub weak_clause_threshold: f64,
    /// Correct answers below this score get the "nearly perfect" wording.
    pub near_perfect: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: SignalWeights::default(),
            tiers: TierThresholds::default(),
            roles: RoleSplit::default(),
            concepts: ConceptBlend::default(),
            generic: GenericOverride::default(),
            fuzzy_threshold: 0.75,
            min_term_len: 3,
            weak_clause_threshold: 0.6,
            near_perfect: 0.9,
        }
    }
}

impl ScoringConfig {
    /// Check that weight groups sum to 1.0 and thresholds are in range.
    pub fn validate(&self) -> Result<(), EvaluationError> {
        let invalid = |msg: String| Err(EvaluationError::InvalidConfig(msg));

        let sum = self.weights.sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return invalid(format!("signal weights sum to {sum}, expected 1.0"));
        }
        let roles = &self.roles;
        let role_sum = roles.subject_weight + roles.action_weight + roles.object_weight;
        if (role_sum - 1.0).abs() > SUM_TOLERANCE {
            return invalid(format!("role weights sum to {role_sum}, expected 1.0"));
        }
        if roles.subjects < 0.0 || roles.actions < 0.0 || roles.subjects + roles.actions > 1.0 {
            return invalid("role split must leave a non-negative share for objects".into());
        }
        let blend = self.concepts.coverage + self.concepts.depth;
        if (blend - 1.0).abs() > SUM_TOLERANCE {
            return invalid(format!("concept blend sums to {blend}, expected 1.0"));
        }
        let tiers = &self.tiers;
        if !(0.0..=1.0).contains(&tiers.partially_correct)
            || !(0.0..=1.0).contains(&tiers.correct)
            || tiers.partially_correct > tiers.correct
        {
            return invalid(format!(
                "tier thresholds must satisfy 0 <= {} <= {} <= 1",
                tiers.partially_correct, tiers.correct
            ));
        }
        if !(self.fuzzy_threshold > 0.0 && self.fuzzy_threshold <= 1.0) {
            return invalid(format!(
                "fuzzy threshold {} must be in (0, 1]",
                self.fuzzy_threshold
            ));
        }
        if self.min_term_len == 0 {
            return invalid("min_term_len must be at least 1".into());
        }
        let generic = &self.generic;
        if generic.min_terms > generic.strong_terms || generic.min_score > generic.strong_score {
            return invalid("generic override floors must increase with matched terms".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ScoringConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.weights.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_weights_not_summing_to_one() {
        let mut config = ScoringConfig::default();
        config.weights.jaccard = 0.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("signal weights"));
    }

    #[test]
    fn rejects_inverted_tiers() {
        let mut config = ScoringConfig::default();
        config.tiers.partially_correct = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn classify_boundaries() {
        let tiers = TierThresholds::default();
        assert_eq!(tiers.classify(0.80), Tier::Correct);
        assert_eq!(tiers.classify(0.7999), Tier::PartiallyCorrect);
        assert_eq!(tiers.classify(0.60), Tier::PartiallyCorrect);
        assert_eq!(tiers.classify(0.5999), Tier::Incorrect);
        assert_eq!(tiers.classify(0.0), Tier::Incorrect);
    }

    #[test]
    fn generic_floor_steps() {
        let generic = GenericOverride::default();
        assert_eq!(generic.floor(0, 0.1), None);
        assert_eq!(generic.floor(1, 0.1), None);
        assert_eq!(generic.floor(2, 0.1), Some(0.85));
        assert_eq!(generic.floor(4, 0.1), Some(0.95));
        assert_eq!(generic.floor(0, 0.71), Some(0.95));
    }

    #[test]
    fn partial_toml_overrides_keep_defaults() {
        let toml_str = r#"
fuzzy_threshold = 0.8

[tiers]
correct = 0.85
"#;
        let config: ScoringConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.fuzzy_threshold, 0.8);
        assert_eq!(config.tiers.correct, 0.85);
        assert_eq!(config.tiers.partially_correct, 0.60);
        assert_eq!(config.weights, SignalWeights::default());
    }

    #[test]
    fn combine_matches_weighted_sum() {
        let signals = SignalScores {
            semantic: 1.0,
            conceptual: 0.0,
            multi_part: 1.0,
            direct: 0.0,
            jaccard: 1.0,
        };
        let combined = SignalWeights::default().combine(&signals);
        assert!((combined - 0.60).abs() < 1e-9);
    }
}
