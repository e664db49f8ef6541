//! tutorgrade-core: free-form answer evaluation, answer sheets and batch grading.
//!
//! The evaluator grades a learner's answer against a reference answer with a
//! blend of lexical, semantic and conceptual signals and returns a score, a
//! three-way tier and feedback. Around it sit the answer sheet format, the
//! batch grading engine and the report types the CLI builds on.
//!
//! ```
//! use tutorgrade_core::{evaluate, Question, ReferenceAnswer, Tier, UserAnswer};
//!
//! let question = Question::new("What is a premium?").with_topic("Premiums");
//! let reference = ReferenceAnswer::new("A premium is the price you pay for an insurance policy.");
//! let answer = UserAnswer::new("A premium is the price you pay for an insurance policy.");
//!
//! let evaluation = evaluate(&question, &reference, &answer).unwrap();
//! assert_eq!(evaluation.tier(), Some(Tier::Correct));
//! ```

pub mod components;
pub mod config;
pub mod coverage;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod fallback;
pub mod feedback;
pub mod fuzzy;
pub mod generic;
pub mod lexicon;
pub mod model;
pub mod multipart;
pub mod overlap;
pub mod parser;
pub mod report;
pub mod results;
pub mod statistics;
pub mod text;
pub mod traits;

pub use config::ScoringConfig;
pub use error::{EvaluationError, ProviderError};
pub use evaluator::{evaluate, Evaluator};
pub use lexicon::DomainContext;
pub use model::{
    Evaluation, EvaluationResult, PartialScore, Question, ReferenceAnswer, RetryPrompt, Signal,
    SignalScores, Tier, UserAnswer,
};
