//! Topic-specific vocabularies for placeholder references.

const BUILTIN_TOPIC_TERMS: &[(&str, &[&str])] = &[
    (
        "risk management",
        &[
            "identify", "assess", "mitigate", "transfer", "avoid", "monitor", "control", "reduce",
            "exposure", "likelihood", "impact", "loss",
        ],
    ),
    (
        "underwriting",
        &[
            "risk", "evaluate", "assess", "applicant", "premium", "policy", "approve", "decline",
            "price", "insurer",
        ],
    ),
    ("deductible", &["pay", "amount", "pocket", "before", "coverage", "claim", "cost"]),
    (
        "premium",
        &["payment", "price", "cost", "coverage", "monthly", "annual", "risk", "policy"],
    ),
    (
        "claim",
        &["request", "loss", "payment", "insurer", "damage", "report", "policyholder", "settle"],
    ),
    (
        "insurance",
        &[
            "risk", "policy", "premium", "coverage", "claim", "insurer", "deductible", "protect",
            "loss", "policyholder",
        ],
    ),
    ("diversif", &["spread", "risk", "portfolio", "asset", "different", "reduce", "investment"]),
    (
        "invest",
        &["return", "risk", "portfolio", "stock", "bond", "diversify", "growth", "asset"],
    ),
    (
        "inflation",
        &["price", "rise", "purchasing", "power", "money", "increase", "cost", "currency"],
    ),
    (
        "supply",
        &["demand", "price", "quantity", "market", "equilibrium", "consumer", "producer"],
    ),
];

const BUILTIN_GENERAL_TERMS: &[&str] = &[
    "risk", "protect", "loss", "cost", "money", "financial", "plan", "strategy", "decision",
    "benefit", "manage", "process",
];

/// Vocabulary a good answer about a topic is expected to use.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicTermTable {
    entries: Vec<(String, Vec<String>)>,
    general: Vec<String>,
}

impl TopicTermTable {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_TOPIC_TERMS
                .iter()
                .map(|(key, terms)| (key.to_string(), to_owned(terms)))
                .collect(),
            general: to_owned(BUILTIN_GENERAL_TERMS),
        }
    }

    /// Terms for the first entry whose key occurs in `haystack`, or nothing.
    pub fn terms_for(&self, haystack: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(key, _)| haystack.contains(key.as_str()))
            .map(|(_, terms)| terms.as_slice())
            .unwrap_or(&[])
    }

    /// Terms that count for any topic.
    pub fn general(&self) -> &[String] {
        &self.general
    }

    /// Topic terms for `haystack` followed by the general terms, deduplicated.
    pub fn candidates(&self, haystack: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for term in self.terms_for(haystack).iter().chain(&self.general) {
            if !out.contains(&term.as_str()) {
                out.push(term);
            }
        }
        out
    }

    /// Insert a custom entry ahead of the existing ones.
    pub fn prepend(&mut self, key: &str, terms: &[String]) {
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return;
        }
        self.entries.retain(|(k, _)| *k != key);
        let terms = terms.iter().map(|t| t.trim().to_lowercase()).collect();
        self.entries.insert(0, (key, terms));
    }

    pub fn extend_general(&mut self, terms: &[String]) {
        for term in terms {
            let term = term.trim().to_lowercase();
            if !term.is_empty() && !self.general.contains(&term) {
                self.general.push(term);
            }
        }
    }
}

impl Default for TopicTermTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn to_owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_key_wins() {
        let table = TopicTermTable::builtin();
        assert_eq!(table.terms_for("risk management risk management")[0], "identify");
        // "insurance premium" hits "premium" before "insurance".
        assert_eq!(table.terms_for("insurance premium")[0], "payment");
        assert!(table.terms_for("photosynthesis").is_empty());
    }

    #[test]
    fn candidates_dedupe_general_terms() {
        let table = TopicTermTable::builtin();
        let candidates = table.candidates("insurance");
        assert_eq!(candidates.iter().filter(|t| **t == "risk").count(), 1);
        assert_eq!(candidates[0], "risk");
        assert!(candidates.contains(&"strategy"));
    }

    #[test]
    fn unknown_topic_uses_general_only() {
        let table = TopicTermTable::builtin();
        assert_eq!(table.candidates("cooking").len(), BUILTIN_GENERAL_TERMS.len());
    }

    #[test]
    fn prepend_and_extend() {
        let mut table = TopicTermTable::builtin();
        table.prepend("Collision", &["accident".to_string(), "Vehicle".to_string()]);
        table.extend_general(&["safety".to_string(), "risk".to_string()]);
        assert_eq!(table.terms_for("collision cover"), ["accident", "vehicle"]);
        assert_eq!(table.general().len(), BUILTIN_GENERAL_TERMS.len() + 1);
    }
}
