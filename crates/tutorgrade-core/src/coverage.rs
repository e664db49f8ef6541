//! Concept-category coverage of an answer.

use serde::{Deserialize, Serialize};

use crate::config::ConceptBlend;
use crate::lexicon::ConceptDomain;

/// How one concept category fared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMatch {
    pub name: String,
    /// The answer tokens (or stems) that matched.
    pub matched: Vec<String>,
    pub total: usize,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptAnalysis {
    pub domain: String,
    pub categories: Vec<CategoryMatch>,
    /// Share of categories with at least one match.
    pub coverage: f64,
    /// Mean category score.
    pub depth: f64,
    /// `coverage` and `depth` blended.
    pub score: f64,
}

impl ConceptAnalysis {
    /// Distinct matched concepts across all categories, in category order.
    pub fn matched_concepts(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for concept in self.categories.iter().flat_map(|c| &c.matched) {
            if !out.contains(concept) {
                out.push(concept.clone());
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConceptCategoryAnalyzer {
    blend: ConceptBlend,
}

impl ConceptCategoryAnalyzer {
    pub fn new(blend: ConceptBlend) -> Self {
        Self { blend }
    }

    /// Score a normalized answer against the categories of `domain`.
    ///
    /// A concept term matches when a token starts with it or the answer
    /// contains it anywhere.
    pub fn analyze(&self, domain: &ConceptDomain, answer: &str) -> ConceptAnalysis {
        let tokens: Vec<&str> = answer.split_whitespace().collect();

        let categories: Vec<CategoryMatch> = domain
            .categories
            .iter()
            .map(|category| {
                let matched: Vec<String> = category
                    .terms
                    .iter()
                    .filter_map(|term| {
                        match tokens.iter().find(|t| t.starts_with(term.as_str())) {
                            Some(token) => Some(token.to_string()),
                            None if answer.contains(term.as_str()) => Some(term.clone()),
                            None => None,
                        }
                    })
                    .collect();
                let total = category.terms.len();
                let score = if total == 0 {
                    0.0
                } else {
                    matched.len() as f64 / total as f64
                };
                CategoryMatch {
                    name: category.name.clone(),
                    matched,
                    total,
                    score,
                }
            })
            .collect();

        let (coverage, depth) = if categories.is_empty() {
            (0.0, 0.0)
        } else {
            let n = categories.len() as f64;
            let hit = categories.iter().filter(|c| !c.matched.is_empty()).count() as f64;
            let depth = categories.iter().map(|c| c.score).sum::<f64>() / n;
            (hit / n, depth)
        };

        ConceptAnalysis {
            domain: domain.key.clone(),
            categories,
            coverage,
            depth,
            score: self.blend.coverage * coverage + self.blend.depth * depth,
        }
    }
}
