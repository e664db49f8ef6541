//! Learner-facing feedback text.

use crate::model::{PartialScore, Signal, SignalScores, Tier};

/// Returned for an empty answer instead of a grade.
pub const RETRY_FEEDBACK: &str = "I didn't catch that. Could you please try answering again?";

/// Praise used for placeholder references, keyed by topic substring.
const GENERIC_FILLERS: &[(&[&str], &str)] = &[
    (
        &["risk"],
        "You named several of the core steps of managing risk.",
    ),
    (
        &["insur", "underwrit", "premium", "claim", "deductible", "polic"],
        "You used the key insurance terms in the right way.",
    ),
    (
        &["invest", "diversif", "stock", "portfolio"],
        "You touched on how investments balance risk and return.",
    ),
    (
        &["econom", "inflation", "supply", "market"],
        "You described the economic forces involved.",
    ),
];

const DEFAULT_FILLER: &str = "You mentioned several ideas that matter for this topic.";

/// Everything the generator looks at for one graded answer.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackInput<'a> {
    pub score: f64,
    pub tier: Tier,
    pub signals: &'a SignalScores,
    pub partial_scores: &'a [PartialScore],
    /// Raw reference text shown back to the learner.
    pub reference: &'a str,
    /// Set when the reference was a placeholder; the topic the answer was
    /// judged against.
    pub generic_topic: Option<&'a str>,
}

#[derive(Debug, Clone, Copy)]
pub struct FeedbackGenerator {
    near_perfect: f64,
    weak_clause_threshold: f64,
}

impl Default for FeedbackGenerator {
    fn default() -> Self {
        Self::new(0.9, 0.6)
    }
}

impl FeedbackGenerator {
    pub fn new(near_perfect: f64, weak_clause_threshold: f64) -> Self {
        Self {
            near_perfect,
            weak_clause_threshold,
        }
    }

    pub fn generate(&self, input: &FeedbackInput<'_>) -> String {
        match input.tier {
            Tier::Correct => self.correct(input),
            Tier::PartiallyCorrect => self.partially_correct(input),
            Tier::Incorrect => self.incorrect(input),
        }
    }

    fn correct(&self, input: &FeedbackInput<'_>) -> String {
        if input.score >= self.near_perfect {
            "Excellent! That's exactly right.".to_string()
        } else {
            "Correct! Your answer is a near-perfect match for the reference answer.".to_string()
        }
    }

    fn partially_correct(&self, input: &FeedbackInput<'_>) -> String {
        let praise = match input.generic_topic {
            Some(topic) => generic_filler(topic),
            None => strength_sentence(input.signals.strongest()),
        };
        let mut text = format!("You're on the right track. {praise}");

        let weak: Vec<&PartialScore> = input
            .partial_scores
            .iter()
            .filter(|p| p.score < self.weak_clause_threshold)
            .collect();
        if !weak.is_empty() {
            text.push_str("\n\nThese parts need more detail:");
            for part in weak {
                text.push_str(&format!("\n- {} ({:.0}%)", part.clause, part.score * 100.0));
            }
        }

        push_reference(&mut text, input.reference);
        text
    }

    fn incorrect(&self, input: &FeedbackInput<'_>) -> String {
        let mut text = if input.signals.semantic <= input.signals.conceptual {
            "Not quite. Your answer doesn't cover the key terms of the reference answer."
        } else {
            "Not quite. Your answer misses the main concepts of this topic."
        }
        .to_string();
        push_reference(&mut text, input.reference);
        text
    }
}

fn strength_sentence(signal: Signal) -> &'static str {
    match signal {
        Signal::Semantic => "You covered the main terms of the reference answer.",
        Signal::Conceptual => "You used the right concepts for this topic.",
        Signal::MultiPart => "You addressed several parts of the question.",
        Signal::Direct => "Your wording is close to the reference answer.",
        Signal::Jaccard => "You used much of the same vocabulary as the reference answer.",
    }
}

fn generic_filler(topic: &str) -> &'static str {
    let topic = topic.to_lowercase();
    GENERIC_FILLERS
        .iter()
        .find(|(keys, _)| keys.iter().any(|k| topic.contains(k)))
        .map(|(_, filler)| *filler)
        .unwrap_or(DEFAULT_FILLER)
}

fn push_reference(text: &mut String, reference: &str) {
    text.push_str("\n\nReference answer: ");
    text.push_str(reference.trim());
}
