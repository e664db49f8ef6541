//! Static term → synonym mapping.

use std::collections::HashMap;

const BUILTIN_SYNONYMS: &[(&str, &[&str])] = &[
    // Insurance
    ("insurer", &["carrier", "insurance company", "company", "underwriter", "provider"]),
    ("policy", &["contract", "coverage", "plan"]),
    ("policyholder", &["insured", "customer", "client", "holder"]),
    ("premium", &["payment", "price", "cost", "fee", "rate"]),
    ("claim", &["request", "demand"]),
    ("coverage", &["protection", "cover", "insurance"]),
    ("deductible", &["excess", "outofpocket"]),
    ("risk", &["danger", "hazard", "exposure", "chance", "threat", "uncertainty"]),
    ("loss", &["damage", "harm"]),
    // Actions
    (
        "evaluate",
        &[
            "assess", "analyze", "review", "examine", "judge", "look", "looking", "appraise",
            "measure", "check", "study",
        ],
    ),
    (
        "assess",
        &["evaluate", "analyze", "review", "examine", "judge", "appraise", "measure", "gauge"],
    ),
    ("decide", &["determine", "choose", "judge", "figure"]),
    ("issue", &["give", "provide", "grant", "write", "offer", "sell"]),
    ("transfer", &["shift", "move", "pass", "hand"]),
    ("mitigate", &["reduce", "lessen", "minimize", "lower", "limit", "decrease"]),
    ("identify", &["find", "spot", "recognize", "detect", "discover"]),
    ("avoid", &["prevent", "escape", "sidestep", "eliminate"]),
    ("monitor", &["track", "watch", "observe", "review"]),
    ("protect", &["safeguard", "shield", "cover", "secure"]),
    ("pay", &["compensate", "reimburse", "cover", "settle"]),
    // Investing and economics
    ("diversify", &["spread", "mix", "vary", "balance"]),
    ("investment", &["asset", "holding", "security"]),
    ("return", &["profit", "gain", "yield", "earnings"]),
    ("increase", &["rise", "grow", "raise", "boost"]),
    ("decrease", &["fall", "drop", "decline", "reduce", "lower"]),
    ("price", &["cost", "rate", "value"]),
    ("buy", &["purchase", "acquire"]),
    // General
    ("function", &["method", "procedure", "routine"]),
    ("process", &["procedure", "method", "system", "way"]),
    ("important", &["key", "essential", "crucial", "significant", "vital"]),
    ("customer", &["client", "buyer", "consumer"]),
    ("company", &["business", "firm", "organization", "corporation"]),
    ("make", &["create", "produce", "build"]),
];

/// Term → ordered set of synonyms.
///
/// Entries are one-directional, but [`SynonymTable::are_linked`] checks both
/// directions, so `claim → request` also links `request` to `claim`.
#[derive(Debug, Clone, PartialEq)]
pub struct SynonymTable {
    entries: HashMap<String, Vec<String>>,
}

impl SynonymTable {
    /// An empty table.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The built-in table.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (term, synonyms) in BUILTIN_SYNONYMS {
            table.insert(term, synonyms.iter().copied());
        }
        table
    }

    /// Add synonyms for `term`, keeping existing ones and skipping duplicates.
    pub fn insert<I, S>(&mut self, term: &str, synonyms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entry = self.entries.entry(term.trim().to_lowercase()).or_default();
        for synonym in synonyms {
            let synonym = synonym.as_ref().trim().to_lowercase();
            if !synonym.is_empty() && !entry.contains(&synonym) {
                entry.push(synonym);
            }
        }
    }

    pub fn synonyms_of(&self, term: &str) -> &[String] {
        self.entries.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `a` and `b` are synonyms in either direction.
    ///
    /// A trailing plural `s` is also tried on both sides, so `moves` links to
    /// `transfer` through `move`.
    pub fn are_linked(&self, a: &str, b: &str) -> bool {
        for x in lookup_forms(a) {
            for y in lookup_forms(b) {
                if x == y {
                    continue;
                }
                if self.lists(x, y) || self.lists(y, x) {
                    return true;
                }
            }
        }
        false
    }

    fn lists(&self, term: &str, candidate: &str) -> bool {
        self.synonyms_of(term).iter().any(|s| s == candidate)
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn lookup_forms(term: &str) -> impl Iterator<Item = &str> {
    let singular = term
        .strip_suffix('s')
        .filter(|_| term.chars().count() > 3);
    std::iter::once(term).chain(singular)
}
