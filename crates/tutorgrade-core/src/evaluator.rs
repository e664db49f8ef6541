//! The answer evaluator.
//!
//! [`Evaluator::evaluate`] runs every signal over one answer and returns an
//! [`Evaluation`]. It performs no I/O and keeps no state between calls, so a
//! single evaluator can be shared across threads.

use std::sync::LazyLock;

use tracing::{debug, warn};

use crate::components::{semantic_similarity, SemanticComponentExtractor, TermMatcher};
use crate::config::ScoringConfig;
use crate::coverage::ConceptCategoryAnalyzer;
use crate::error::EvaluationError;
use crate::feedback::{FeedbackGenerator, FeedbackInput, RETRY_FEEDBACK};
use crate::fuzzy::{direct_similarity, FuzzyMatcher};
use crate::generic::GenericAnswerDetector;
use crate::lexicon::DomainContext;
use crate::model::{
    Evaluation, EvaluationResult, Question, ReferenceAnswer, RetryPrompt, SignalScores,
    UserAnswer,
};
use crate::multipart::{multi_part_score, MultiPartDecomposer};
use crate::overlap::jaccard_with_synonyms;
use crate::text::{contains_phrase, normalize, token_set};

static DEFAULT_EVALUATOR: LazyLock<Evaluator> = LazyLock::new(Evaluator::default);

/// Grade an answer with the default configuration and built-in tables.
pub fn evaluate(
    question: &Question,
    reference: &ReferenceAnswer,
    answer: &UserAnswer,
) -> Result<Evaluation, EvaluationError> {
    DEFAULT_EVALUATOR.evaluate(question, reference, answer)
}

#[derive(Debug, Clone)]
pub struct Evaluator {
    config: ScoringConfig,
    context: DomainContext,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self {
            config: ScoringConfig::default(),
            context: DomainContext::builtin(),
        }
    }
}

impl Evaluator {
    /// Create an evaluator, rejecting inconsistent configuration.
    pub fn new(config: ScoringConfig) -> Result<Self, EvaluationError> {
        config.validate()?;
        Ok(Self {
            config,
            context: DomainContext::builtin(),
        })
    }

    /// Replace the vocabulary tables.
    pub fn with_context(mut self, context: DomainContext) -> Self {
        self.context = context;
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn context(&self) -> &DomainContext {
        &self.context
    }

    /// Grade `answer` against `reference` using this evaluator's tables.
    pub fn evaluate(
        &self,
        question: &Question,
        reference: &ReferenceAnswer,
        answer: &UserAnswer,
    ) -> Result<Evaluation, EvaluationError> {
        self.evaluate_with(question, reference, answer, &self.context)
    }

    /// Grade `answer` against `reference` using the given tables.
    ///
    /// Empty answers produce a retry prompt. An empty reference is an error.
    pub fn evaluate_with(
        &self,
        question: &Question,
        reference: &ReferenceAnswer,
        answer: &UserAnswer,
        context: &DomainContext,
    ) -> Result<Evaluation, EvaluationError> {
        let user = normalize(&answer.text);
        if user.is_empty() {
            debug!(question = %question.text, "empty answer, asking for a retry");
            return Ok(Evaluation::RetryPrompt(RetryPrompt {
                feedback: RETRY_FEEDBACK.to_string(),
            }));
        }
        let reference_norm = normalize(&reference.text);
        if reference_norm.is_empty() {
            return Err(EvaluationError::InvalidReference);
        }

        let config = &self.config;
        let min_len = config.min_term_len;
        let matcher = TermMatcher::new(&context.synonyms, FuzzyMatcher::new(config.fuzzy_threshold));

        let extractor = SemanticComponentExtractor::new(min_len, config.roles);
        let user_parts = extractor.extract(&user);
        let reference_parts = extractor.extract(&reference_norm);
        let semantic = semantic_similarity(&user_parts, &reference_parts, &matcher, &config.roles);

        let domain = context.concepts.select(&question.topic, &question.text);
        let concepts = ConceptCategoryAnalyzer::new(config.concepts).analyze(domain, &user);

        let decomposer = MultiPartDecomposer::new(min_len);
        let clauses = decomposer.decompose(&reference.text);
        let partial_scores = decomposer.score(&clauses, &user_parts.terms, &matcher);

        let signals = SignalScores {
            semantic,
            conceptual: concepts.score,
            multi_part: multi_part_score(&partial_scores, semantic),
            direct: direct_similarity(&user, &reference_norm),
            jaccard: jaccard_with_synonyms(
                &token_set(&user, min_len),
                &token_set(&reference_norm, min_len),
                &context.synonyms,
            ),
        };

        let mut score = config.weights.combine(&signals).clamp(0.0, 1.0);
        let verbatim = contains_phrase(&user, &reference_norm);
        if verbatim {
            score = 1.0;
        }

        let mut matched_concepts = concepts.matched_concepts();
        let detector = GenericAnswerDetector::new(config.generic);
        let generic = if detector.is_generic(&reference_norm) {
            let assessment = detector.assess(
                &question.text,
                &question.topic,
                &user,
                concepts.score,
                &context.topic_terms,
                &context.synonyms,
            );
            warn!(
                topic = %assessment.topic,
                matched = assessment.matched_terms.len(),
                floor = ?assessment.floor,
                "placeholder reference answer, grading by topic vocabulary"
            );
            if let Some(floor) = assessment.floor {
                score = score.max(floor);
            }
            for term in &assessment.matched_terms {
                if !matched_concepts.contains(term) {
                    matched_concepts.push(term.clone());
                }
            }
            Some(assessment)
        } else {
            None
        };

        let tier = config.tiers.classify(score);
        let feedback = FeedbackGenerator::new(config.near_perfect, config.weak_clause_threshold)
            .generate(&FeedbackInput {
                score,
                tier,
                signals: &signals,
                partial_scores: &partial_scores,
                reference: &reference.text,
                generic_topic: generic.as_ref().map(|g| g.topic.as_str()),
            });

        debug!(
            domain = %concepts.domain,
            semantic = signals.semantic,
            conceptual = signals.conceptual,
            multi_part = signals.multi_part,
            direct = signals.direct,
            jaccard = signals.jaccard,
            clauses = partial_scores.len(),
            generic = generic.is_some(),
            verbatim,
            score,
            tier = %tier,
            "evaluated answer"
        );

        Ok(Evaluation::Graded(EvaluationResult {
            score,
            tier,
            feedback,
            matched_concepts,
            partial_scores,
            signals,
            generic_reference: generic.is_some(),
            verbatim,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tier;

    fn underwriting() -> (Question, ReferenceAnswer) {
        (
            Question::new("What is underwriting?")
                .with_topic("Underwriting")
                .with_subject("Insurance"),
            ReferenceAnswer::new(
                "Underwriting is the process insurers use to evaluate risk and decide \
                 whether to issue a policy.",
            ),
        )
    }

    #[test]
    fn empty_answer_is_retry() {
        let (q, r) = underwriting();
        let result = evaluate(&q, &r, &UserAnswer::new("  ?! ")).unwrap();
        assert!(result.is_retry());
        assert_eq!(result.feedback(), RETRY_FEEDBACK);
    }

    #[test]
    fn empty_reference_is_error() {
        let (q, _) = underwriting();
        let err = evaluate(&q, &ReferenceAnswer::new("..."), &UserAnswer::new("risk")).unwrap_err();
        assert_eq!(err, EvaluationError::InvalidReference);
    }

    #[test]
    fn empty_answer_checked_before_reference() {
        let (q, _) = underwriting();
        let result = evaluate(&q, &ReferenceAnswer::new(""), &UserAnswer::new("")).unwrap();
        assert!(result.is_retry());
    }

    #[test]
    fn paraphrase_keeps_role_order_signal() {
        let (q, r) = underwriting();
        let answer = UserAnswer::new(
            "it's how insurers decide if they should give you a policy by looking at risk",
        );
        let graded = evaluate(&q, &r, &answer).unwrap();
        let result = graded.graded().unwrap();
        // "risk" and "policy" sit in the object bucket of both texts.
        assert!((result.signals.semantic - 0.2).abs() < 1e-9);
        assert_eq!(result.signals.multi_part, result.signals.semantic);
        assert!(result.score > 0.25 && result.score < 0.6, "score was {}", result.score);
        assert!(!result.generic_reference);
        assert!(result.partial_scores.is_empty());
        assert!(result.matched_concepts.iter().any(|c| c == "insurers"));
    }

    #[test]
    fn exact_answer_is_verbatim() {
        let (q, r) = underwriting();
        let graded = evaluate(&q, &r, &UserAnswer::new(r.text.clone())).unwrap();
        let result = graded.graded().unwrap();
        assert_eq!(result.score, 1.0);
        assert_eq!(result.tier, Tier::Correct);
        assert!(result.verbatim);
        assert!(result.feedback.starts_with("Excellent"));
    }

    #[test]
    fn new_rejects_bad_config() {
        let mut config = ScoringConfig::default();
        config.weights.direct = 0.9;
        assert!(matches!(
            Evaluator::new(config),
            Err(EvaluationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn stricter_tiers_change_classification() {
        let mut config = ScoringConfig::default();
        config.tiers.correct = 0.99;
        config.tiers.partially_correct = 0.95;
        let evaluator = Evaluator::new(config).unwrap();
        let (q, r) = underwriting();
        let answer = UserAnswer::new(
            "it's how insurers decide if they should give you a policy by looking at risk",
        );
        let graded = evaluator.evaluate(&q, &r, &answer).unwrap();
        assert_eq!(graded.tier(), Some(Tier::Incorrect));
    }

    #[test]
    fn custom_context_is_used() {
        let mut context = DomainContext::builtin();
        context.synonyms.insert("collision", ["crash"]);
        let evaluator = Evaluator::default().with_context(context);
        let q = Question::new("What does collision cover pay for?").with_topic("Auto");
        let r = ReferenceAnswer::new("Collision coverage pays for a crash.");
        let answer = UserAnswer::new("it pays after a collision");
        let with_synonym = evaluator.evaluate(&q, &r, &answer).unwrap().score().unwrap();
        let without = evaluate(&q, &r, &answer).unwrap().score().unwrap();
        assert!(with_synonym > without);
    }
}
