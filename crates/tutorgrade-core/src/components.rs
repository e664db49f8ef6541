//! Term extraction, role buckets and term-level matching.
//!
//! Role buckets are a positional proxy for grammatical role: the first share
//! of content terms are treated as subjects, the next as actions and the rest
//! as objects. No parsing is involved.

use crate::config::RoleSplit;
use crate::fuzzy::FuzzyMatcher;
use crate::lexicon::SynonymTable;
use crate::text::content_terms;

/// Content terms of a text split into role buckets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SemanticComponents {
    pub terms: Vec<String>,
    pub subjects: Vec<String>,
    pub actions: Vec<String>,
    pub objects: Vec<String>,
}

impl SemanticComponents {
    /// Buckets in subject, action, object order.
    fn buckets(&self) -> [&[String]; 3] {
        [&self.subjects, &self.actions, &self.objects]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SemanticComponentExtractor {
    min_term_len: usize,
    split: RoleSplit,
}

impl SemanticComponentExtractor {
    pub fn new(min_term_len: usize, split: RoleSplit) -> Self {
        Self {
            min_term_len,
            split,
        }
    }

    /// Extract content terms from normalized text and bucket them.
    pub fn extract(&self, normalized: &str) -> SemanticComponents {
        self.partition(content_terms(normalized, self.min_term_len))
    }

    /// Bucket an existing term list by position.
    pub fn partition(&self, terms: Vec<String>) -> SemanticComponents {
        let n = terms.len() as f64;
        let subjects_end = (n * self.split.subjects).floor() as usize;
        let actions_end = ((n * (self.split.subjects + self.split.actions)).floor() as usize)
            .max(subjects_end)
            .min(terms.len());
        let subjects_end = subjects_end.min(actions_end);

        SemanticComponents {
            subjects: terms[..subjects_end].to_vec(),
            actions: terms[subjects_end..actions_end].to_vec(),
            objects: terms[actions_end..].to_vec(),
            terms,
        }
    }
}

/// Decides whether a user term stands for a reference term.
#[derive(Debug, Clone, Copy)]
pub struct TermMatcher<'a> {
    synonyms: &'a SynonymTable,
    fuzzy: FuzzyMatcher,
}

impl<'a> TermMatcher<'a> {
    pub fn new(synonyms: &'a SynonymTable, fuzzy: FuzzyMatcher) -> Self {
        Self { synonyms, fuzzy }
    }

    /// Equal, either one contains the other, fuzzy-similar, or synonyms.
    pub fn matches(&self, user: &str, reference: &str) -> bool {
        user == reference
            || reference.contains(user)
            || user.contains(reference)
            || self.fuzzy.is_match(user, reference)
            || self.synonyms.are_linked(user, reference)
    }

    pub fn matches_any(&self, user_terms: &[String], reference: &str) -> bool {
        user_terms.iter().any(|u| self.matches(u, reference))
    }

    /// Fraction of `reference_terms` matched by some user term; 0 when there
    /// are no reference terms.
    pub fn coverage(&self, user_terms: &[String], reference_terms: &[String]) -> f64 {
        if reference_terms.is_empty() {
            return 0.0;
        }
        let matched = reference_terms
            .iter()
            .filter(|r| self.matches_any(user_terms, r))
            .count();
        matched as f64 / reference_terms.len() as f64
    }
}

/// Weighted role-bucket coverage of the reference by the user.
///
/// Each reference bucket is matched against the user bucket of the same
/// role. An empty reference bucket scores 0 and keeps its weight.
pub fn semantic_similarity(
    user: &SemanticComponents,
    reference: &SemanticComponents,
    matcher: &TermMatcher<'_>,
    split: &RoleSplit,
) -> f64 {
    let weights = [split.subject_weight, split.action_weight, split.object_weight];
    user.buckets()
        .into_iter()
        .zip(reference.buckets())
        .zip(weights)
        .map(|((user_bucket, reference_bucket), weight)| {
            weight * matcher.coverage(user_bucket, reference_bucket)
        })
        .sum()
}
