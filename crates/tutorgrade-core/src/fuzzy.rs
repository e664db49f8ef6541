//! String similarity measures.

/// Normalized-edit-distance matcher with an acceptance threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    threshold: f64,
}

impl FuzzyMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Similarity in `[0, 1]`: one minus the Levenshtein distance divided by
    /// the longer length. Two empty strings are identical.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b)
    }

    pub fn is_match(&self, a: &str, b: &str) -> bool {
        self.similarity(a, b) >= self.threshold
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(0.75)
    }
}

/// Sørensen–Dice coefficient over character bigrams of two whole strings.
///
/// Whitespace is ignored, so word boundaries do not produce bigrams.
pub fn direct_similarity(a: &str, b: &str) -> f64 {
    strsim::sorensen_dice(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similarity_bounds() {
        let m = FuzzyMatcher::default();
        assert_eq!(m.similarity("risk", "risk"), 1.0);
        assert_eq!(m.similarity("", ""), 1.0);
        assert_eq!(m.similarity("abc", ""), 0.0);
        let s = m.similarity("policy", "polcy");
        assert!(s > 0.0 && s < 1.0);
    }

    #[test]
    fn threshold_accepts_small_typos() {
        let m = FuzzyMatcher::default();
        // One edit in eight characters: 0.875.
        assert!(m.is_match("evaluate", "evaluete"));
        // "insurer" vs "insured": one edit in seven, 0.857.
        assert!(m.is_match("insurer", "insured"));
        assert!(!m.is_match("risk", "rust"));
        assert!(!m.is_match("premium", "policy"));
    }

    #[test]
    fn custom_threshold() {
        let strict = FuzzyMatcher::new(0.9);
        assert!(!strict.is_match("evaluate", "evaluete"));
        assert_eq!(strict.threshold(), 0.9);
    }

    #[test]
    fn direct_similarity_range() {
        assert_eq!(direct_similarity("same words", "same words"), 1.0);
        assert_eq!(direct_similarity("a", "b"), 0.0);
        let partial = direct_similarity("insurers evaluate risk", "insurers assess risk");
        assert!(partial > 0.5 && partial < 1.0);
        assert!(direct_similarity("pizza with friends", "underwriting policy") < 0.3);
    }
}
