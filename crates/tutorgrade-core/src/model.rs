//! Core data model types for tutorgrade.
//!
//! These are the value types passed across the evaluator boundary: the
//! question being asked, the reference and user answers, and the result
//! handed back to the UI layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A question posed to the learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question text, e.g. "What is underwriting?".
    pub text: String,
    /// Topic name used to select concept dictionaries, e.g. "Underwriting".
    #[serde(default)]
    pub topic: String,
    /// Subject the topic belongs to, e.g. "Insurance".
    #[serde(default)]
    pub subject: String,
}

impl Question {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            topic: String::new(),
            subject: String::new(),
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }
}

/// The answer a learner is graded against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceAnswer {
    pub text: String,
}

impl ReferenceAnswer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// What the learner said or typed. Empty is valid input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAnswer {
    pub text: String,
}

impl UserAnswer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Three-way correctness classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Correct,
    PartiallyCorrect,
    Incorrect,
}

impl Tier {
    /// Whether downstream callbacks should treat this tier as earning credit.
    pub fn gives_credit(self) -> bool {
        matches!(self, Tier::Correct | Tier::PartiallyCorrect)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Correct => write!(f, "correct"),
            Tier::PartiallyCorrect => write!(f, "partially_correct"),
            Tier::Incorrect => write!(f, "incorrect"),
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "correct" => Ok(Tier::Correct),
            "partially_correct" | "partial" => Ok(Tier::PartiallyCorrect),
            "incorrect" => Ok(Tier::Incorrect),
            other => Err(format!("unknown tier: {other}")),
        }
    }
}

/// Score of one reference clause against the user answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialScore {
    pub clause: String,
    pub score: f64,
}

/// The sub-signals that feed the aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Semantic,
    Conceptual,
    MultiPart,
    Direct,
    Jaccard,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Semantic => write!(f, "semantic"),
            Signal::Conceptual => write!(f, "conceptual"),
            Signal::MultiPart => write!(f, "multi_part"),
            Signal::Direct => write!(f, "direct"),
            Signal::Jaccard => write!(f, "jaccard"),
        }
    }
}

/// Every partial score computed for one evaluation, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalScores {
    /// Role-bucket term similarity.
    pub semantic: f64,
    /// Concept-category coverage and depth.
    pub conceptual: f64,
    /// Mean clause score, or the semantic score for single-clause references.
    pub multi_part: f64,
    /// Character-bigram similarity of the two normalized strings.
    pub direct: f64,
    /// Synonym-aware set overlap.
    pub jaccard: f64,
}

impl SignalScores {
    pub fn get(&self, signal: Signal) -> f64 {
        match signal {
            Signal::Semantic => self.semantic,
            Signal::Conceptual => self.conceptual,
            Signal::MultiPart => self.multi_part,
            Signal::Direct => self.direct,
            Signal::Jaccard => self.jaccard,
        }
    }

    /// The highest-scoring signal. Ties resolve in declaration order.
    pub fn strongest(&self) -> Signal {
        const ORDER: [Signal; 5] = [
            Signal::Semantic,
            Signal::Conceptual,
            Signal::MultiPart,
            Signal::Direct,
            Signal::Jaccard,
        ];
        let mut best = ORDER[0];
        for signal in ORDER.into_iter().skip(1) {
            if self.get(signal) > self.get(best) {
                best = signal;
            }
        }
        best
    }
}

/// A graded attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Final score in `[0, 1]`.
    pub score: f64,
    pub tier: Tier,
    pub feedback: String,
    /// Domain concepts found in the user answer.
    pub matched_concepts: Vec<String>,
    /// Per-clause scores; empty for single-clause references.
    pub partial_scores: Vec<PartialScore>,
    pub signals: SignalScores,
    /// The reference was a placeholder and domain terms decided the score.
    #[serde(default)]
    pub generic_reference: bool,
    /// The user answer contained the whole reference answer.
    #[serde(default)]
    pub verbatim: bool,
}

impl EvaluationResult {
    pub fn gives_credit(&self) -> bool {
        self.tier.gives_credit()
    }
}

/// Returned instead of a grade when there was nothing to grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPrompt {
    pub feedback: String,
}

/// The outcome of one `evaluate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Evaluation {
    Graded(EvaluationResult),
    RetryPrompt(RetryPrompt),
}

impl Evaluation {
    /// The graded result, or `None` for a retry prompt.
    pub fn graded(&self) -> Option<&EvaluationResult> {
        match self {
            Evaluation::Graded(result) => Some(result),
            Evaluation::RetryPrompt(_) => None,
        }
    }

    pub fn score(&self) -> Option<f64> {
        self.graded().map(|r| r.score)
    }

    pub fn tier(&self) -> Option<Tier> {
        self.graded().map(|r| r.tier)
    }

    pub fn feedback(&self) -> &str {
        match self {
            Evaluation::Graded(result) => &result.feedback,
            Evaluation::RetryPrompt(prompt) => &prompt.feedback,
        }
    }

    pub fn is_retry(&self) -> bool {
        matches!(self, Evaluation::RetryPrompt(_))
    }
}

/// A set of learner answers to grade together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSheet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Subject shared by every item, e.g. "Insurance".
    #[serde(default)]
    pub subject: String,
    pub items: Vec<SheetItem>,
}

/// One question with the learner's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetItem {
    pub id: String,
    #[serde(default)]
    pub topic: String,
    pub question: String,
    /// Reference answer; fetched or looked up when absent.
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Tier a reviewer assigned by hand, for checking the grader.
    #[serde(default)]
    pub expected_tier: Option<Tier>,
}

impl SheetItem {
    pub fn to_question(&self, subject: &str) -> Question {
        Question::new(self.question.clone())
            .with_topic(self.topic.clone())
            .with_subject(subject)
    }

    pub fn user_answer(&self) -> UserAnswer {
        UserAnswer::new(self.answer.clone())
    }
}
