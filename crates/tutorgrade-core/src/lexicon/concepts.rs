//! Per-domain concept dictionaries.
//!
//! Concept terms are stems (`mitigat`, `underwrit`) matched as token prefixes,
//! so one entry covers `mitigate`, `mitigates` and `mitigation`.

use serde::{Deserialize, Serialize};

type BuiltinDomain = (&'static str, &'static [&'static str], &'static [BuiltinCategory]);
type BuiltinCategory = (&'static str, &'static [&'static str]);

const BUILTIN_DOMAINS: &[BuiltinDomain] = &[
    (
        "risk_management",
        &["risk management", "risk assessment", "risk control", "mitigation"],
        &[
            ("risk_processes", &["identif", "assess", "mitigat", "transfer", "monitor"]),
            ("risk_concepts", &["risk", "loss", "exposure", "likelihood", "impact"]),
            ("risk_controls", &["control", "avoid", "reduc", "insur", "hedg"]),
            ("risk_outcomes", &["protect", "prevent", "minimi", "uncertain", "safe"]),
        ],
    ),
    (
        "insurance",
        &[
            "insur", "underwrit", "policy", "policies", "premium", "claim", "deductible",
            "coverage", "actuar",
        ],
        &[
            ("insurance_entities", &["insur", "polic", "premium", "claim", "underwrit"]),
            ("risk_concepts", &["risk", "loss", "hazard", "peril", "exposure"]),
            ("insurance_processes", &["evaluat", "assess", "decid", "issu", "review"]),
            ("financial_terms", &["pay", "cost", "deductible", "coverage", "benefit"]),
        ],
    ),
    (
        "investing",
        &["invest", "stock", "bond", "portfolio", "diversif", "dividend", "asset"],
        &[
            ("investment_vehicles", &["stock", "bond", "fund", "share", "asset"]),
            ("portfolio_concepts", &["diversif", "portfolio", "allocat", "balanc", "spread"]),
            ("returns", &["return", "dividend", "interest", "growth", "yield"]),
            ("risk_factors", &["risk", "volatil", "loss", "market", "inflation"]),
        ],
    ),
    (
        "economics",
        &["econom", "inflation", "supply", "demand", "market", "gdp", "interest rate"],
        &[
            ("market_forces", &["supply", "demand", "price", "market", "competit"]),
            ("macro_indicators", &["inflation", "gdp", "unemploy", "growth", "recession"]),
            ("policy_tools", &["interest", "tax", "spending", "monetar", "fiscal"]),
            ("economic_actors", &["consumer", "producer", "government", "bank", "firm"]),
        ],
    ),
    (
        "programming",
        &["programming", "algorithm", "function", "variable", "code", "software", "compil"],
        &[
            ("program_structures", &["function", "variable", "loop", "class", "object"]),
            ("operations", &["call", "return", "assign", "iterat", "execut"]),
            ("data_concepts", &["data", "type", "value", "array", "list"]),
            ("quality", &["test", "debug", "error", "compil", "readab"]),
        ],
    ),
    (
        "biology",
        &["biolog", "cell", "photosynth", "dna", "gene", "organism", "evolution"],
        &[
            ("cell_biology", &["cell", "membrane", "nucleus", "organelle", "mitochondri"]),
            ("life_processes", &["photosynth", "respir", "divi", "replicat", "metabol"]),
            ("genetics", &["dna", "gene", "chromosom", "protein", "inherit"]),
            ("ecology", &["organism", "environment", "ecosystem", "species", "evolut"]),
        ],
    ),
];

const GENERAL_DOMAIN: BuiltinDomain = (
    "general",
    &[],
    &[
        ("process", &["process", "step", "method", "procedure", "system"]),
        ("entities", &["person", "people", "organization", "company", "individual"]),
        ("actions", &["make", "create", "provide", "manage", "help"]),
        ("attributes", &["important", "main", "specific", "different", "significant"]),
    ],
);

/// A named group of concept stems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptCategory {
    pub name: String,
    pub terms: Vec<String>,
}

/// Concept categories for one subject area, selected by trigger substrings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptDomain {
    pub key: String,
    /// Lowercase substrings of the topic or question that select this domain.
    #[serde(default)]
    pub triggers: Vec<String>,
    pub categories: Vec<ConceptCategory>,
}

impl ConceptDomain {
    fn from_builtin((key, triggers, categories): &BuiltinDomain) -> Self {
        Self {
            key: key.to_string(),
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
            categories: categories
                .iter()
                .map(|(name, terms)| ConceptCategory {
                    name: name.to_string(),
                    terms: terms.iter().map(|t| t.to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Lowercase every trigger and term in place and drop empty categories.
    pub(crate) fn normalized(mut self) -> Self {
        self.key = self.key.trim().to_string();
        self.triggers = lowercase_all(self.triggers);
        for category in &mut self.categories {
            category.terms = lowercase_all(std::mem::take(&mut category.terms));
        }
        self.categories.retain(|c| !c.terms.is_empty());
        self
    }

    fn is_triggered_by(&self, haystack: &str) -> bool {
        self.triggers.iter().any(|t| haystack.contains(t.as_str()))
    }
}

fn lowercase_all(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Ordered domains plus the fallback used when no trigger matches.
#[derive(Debug, Clone, PartialEq)]
pub struct ConceptDictionary {
    domains: Vec<ConceptDomain>,
    fallback: ConceptDomain,
}

impl ConceptDictionary {
    pub fn builtin() -> Self {
        Self {
            domains: BUILTIN_DOMAINS.iter().map(ConceptDomain::from_builtin).collect(),
            fallback: ConceptDomain::from_builtin(&GENERAL_DOMAIN),
        }
    }

    /// Pick the domain for a question.
    ///
    /// Domains are tried in order against `topic + " " + question`,
    /// lowercased; the first with a matching trigger wins.
    pub fn select(&self, topic: &str, question: &str) -> &ConceptDomain {
        let haystack = format!("{topic} {question}").to_lowercase();
        self.domains
            .iter()
            .find(|d| d.is_triggered_by(&haystack))
            .unwrap_or(&self.fallback)
    }

    /// Insert custom domains ahead of the existing ones.
    ///
    /// A custom domain with the key of an existing one replaces it.
    pub fn prepend(&mut self, custom: Vec<ConceptDomain>) {
        let custom: Vec<ConceptDomain> = custom
            .into_iter()
            .map(ConceptDomain::normalized)
            .filter(|d| !d.categories.is_empty())
            .collect();
        self.domains.retain(|d| custom.iter().all(|c| c.key != d.key));
        let rest = std::mem::take(&mut self.domains);
        self.domains = custom;
        self.domains.extend(rest);
    }

    pub fn domains(&self) -> &[ConceptDomain] {
        &self.domains
    }

    pub fn fallback(&self) -> &ConceptDomain {
        &self.fallback
    }
}

impl Default for ConceptDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_first_triggered_domain() {
        let dict = ConceptDictionary::builtin();
        assert_eq!(dict.select("Underwriting", "What is underwriting?").key, "insurance");
        // The question mentions insurers, but risk management is tried first.
        assert_eq!(
            dict.select("Risk Management", "How do insurers handle risk?").key,
            "risk_management"
        );
        assert_eq!(dict.select("Stocks", "What is a dividend?").key, "investing");
    }

    #[test]
    fn falls_back_to_general() {
        let dict = ConceptDictionary::builtin();
        let domain = dict.select("Cooking", "How do you boil pasta?");
        assert_eq!(domain.key, "general");
        assert_eq!(domain.categories.len(), 4);
    }

    #[test]
    fn every_builtin_category_has_terms() {
        let dict = ConceptDictionary::builtin();
        for domain in dict.domains() {
            assert!(!domain.triggers.is_empty(), "{} has no triggers", domain.key);
            for category in &domain.categories {
                assert!(!category.terms.is_empty());
            }
        }
    }

    #[test]
    fn prepended_domains_take_priority() {
        let mut dict = ConceptDictionary::builtin();
        dict.prepend(vec![ConceptDomain {
            key: "auto".into(),
            triggers: vec!["Car Insurance".into()],
            categories: vec![ConceptCategory {
                name: "vehicles".into(),
                terms: vec!["Car".into(), "vehicle".into()],
            }],
        }]);
        let domain = dict.select("Car insurance", "What is collision cover?");
        assert_eq!(domain.key, "auto");
        assert_eq!(domain.categories[0].terms, vec!["car", "vehicle"]);
        assert_eq!(dict.domains().len(), BUILTIN_DOMAINS.len() + 1);
    }

    #[test]
    fn prepend_replaces_same_key() {
        let mut dict = ConceptDictionary::builtin();
        dict.prepend(vec![ConceptDomain {
            key: "biology".into(),
            triggers: vec!["botany".into()],
            categories: vec![ConceptCategory {
                name: "plants".into(),
                terms: vec!["leaf".into()],
            }],
        }]);
        assert_eq!(dict.domains().len(), BUILTIN_DOMAINS.len());
        assert_eq!(dict.select("Botany", "").key, "biology");
        assert_eq!(dict.select("Cell biology", "").key, "general");
    }
}
