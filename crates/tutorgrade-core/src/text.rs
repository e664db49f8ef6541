//! Text normalization and tokenizing helpers.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Characters removed during normalization.
pub const PUNCTUATION: &[char] = &[
    '.', ',', '?', '!', ';', ':', '(', ')', '[', ']', '{', '}', '\'', '"', '-',
];

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any", "are", "as",
    "at", "be", "because", "been", "before", "being", "below", "between", "both", "but", "by",
    "can", "could", "did", "do", "does", "doing", "done", "down", "during", "each", "either",
    "every", "few", "for", "from", "further", "get", "gets", "got", "had", "has", "have",
    "having", "he", "her", "here", "hers", "him", "his", "how", "however", "i", "if", "in",
    "into", "is", "it", "its", "itself", "just", "like", "me", "more", "most", "much", "must",
    "my", "neither", "no", "nor", "not", "of", "off", "on", "once", "one", "only", "or",
    "other", "our", "ours", "out", "over", "own", "same", "she", "should", "so", "some", "such",
    "than", "that", "the", "their", "theirs", "them", "then", "there", "these", "they", "this",
    "those", "through", "thus", "to", "too", "under", "until", "up", "upon", "us", "use", "used",
    "uses", "using", "very", "was", "we", "were", "what", "when", "where", "whether", "which",
    "while", "who", "whom", "whose", "why", "will", "with", "would", "yet", "you", "your",
    "yours",
];

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

/// Lowercase, strip punctuation, collapse whitespace and trim.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !PUNCTUATION.contains(c))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORD_SET.contains(token)
}

/// Distinct content terms of normalized text, in first-seen order.
///
/// A content term is a token of at least `min_len` characters that is not a
/// stop word.
pub fn content_terms(normalized: &str, min_len: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    normalized
        .split_whitespace()
        .filter(|t| t.chars().count() >= min_len && !is_stop_word(t))
        .filter(|t| seen.insert(*t))
        .map(str::to_string)
        .collect()
}

/// Distinct tokens of normalized text with at least `min_len` characters.
///
/// Unlike [`content_terms`], stop words are kept.
pub fn token_set(normalized: &str, min_len: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    normalized
        .split_whitespace()
        .filter(|t| t.chars().count() >= min_len)
        .filter(|t| seen.insert(*t))
        .map(str::to_string)
        .collect()
}

/// Split raw text into trimmed, non-empty clauses on `.`, `;` and newlines.
pub fn split_clauses(text: &str) -> Vec<&str> {
    text.split(['.', ';', '\n'])
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

/// Whether `needle` occurs in `haystack` on whole-word boundaries.
///
/// Both arguments are expected to be normalized.
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    format!(" {haystack} ").contains(&format!(" {needle} "))
}
