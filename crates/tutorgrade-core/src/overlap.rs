//! Synonym-aware set overlap.

use crate::lexicon::SynonymTable;

/// Jaccard index of two token sets where synonyms count as equal.
///
/// The intersection is the number of reference terms with an equal or
/// linked user term, capped at the smaller set size so the union never
/// shrinks below either set. Returns 0 when either set is empty.
pub fn jaccard_with_synonyms(
    user_terms: &[String],
    reference_terms: &[String],
    synonyms: &SynonymTable,
) -> f64 {
    if user_terms.is_empty() || reference_terms.is_empty() {
        return 0.0;
    }
    let intersection = reference_terms
        .iter()
        .filter(|r| {
            user_terms
                .iter()
                .any(|u| u == *r || synonyms.are_linked(r, u))
        })
        .count()
        .min(user_terms.len())
        .min(reference_terms.len());
    let union = user_terms.len() + reference_terms.len() - intersection;
    intersection as f64 / union as f64
}
