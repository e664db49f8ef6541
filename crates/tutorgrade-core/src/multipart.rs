//! Clause-by-clause scoring of multi-part references.

use crate::components::TermMatcher;
use crate::model::PartialScore;
use crate::text::{content_terms, normalize, split_clauses};

/// A reference clause and the terms it is graded on.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub text: String,
    pub terms: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct MultiPartDecomposer {
    min_term_len: usize,
}

impl MultiPartDecomposer {
    pub fn new(min_term_len: usize) -> Self {
        Self { min_term_len }
    }

    /// Split a raw reference into clauses that carry at least one content
    /// term.
    pub fn decompose(&self, reference: &str) -> Vec<Clause> {
        split_clauses(reference)
            .into_iter()
            .filter_map(|clause| {
                let terms = content_terms(&normalize(clause), self.min_term_len);
                if terms.is_empty() {
                    return None;
                }
                Some(Clause {
                    text: clause.to_string(),
                    terms,
                })
            })
            .collect()
    }

    /// Score each clause by the share of its terms the user matched.
    ///
    /// Returns an empty list for single-clause references.
    pub fn score(
        &self,
        clauses: &[Clause],
        user_terms: &[String],
        matcher: &TermMatcher<'_>,
    ) -> Vec<PartialScore> {
        if clauses.len() < 2 {
            return Vec::new();
        }
        clauses
            .iter()
            .map(|clause| PartialScore {
                clause: clause.text.clone(),
                score: matcher.coverage(user_terms, &clause.terms),
            })
            .collect()
    }
}

/// Mean clause score, or `fallback` when there are no clause scores.
pub fn multi_part_score(partials: &[PartialScore], fallback: f64) -> f64 {
    if partials.is_empty() {
        fallback
    } else {
        partials.iter().map(|p| p.score).sum::<f64>() / partials.len() as f64
    }
}
