//! Vocabulary tables the evaluator consults.
//!
//! [`DomainContext`] bundles the synonym table, the concept dictionaries and
//! the topic vocabularies. The built-in tables cover insurance, risk
//! management, investing, economics, programming and biology; a lexicon TOML
//! file can add more:
//!
//! ```toml
//! general_terms = ["safety"]
//!
//! [synonyms]
//! collision = ["crash", "accident"]
//!
//! [[domains]]
//! key = "auto_insurance"
//! triggers = ["car insurance", "collision"]
//!
//! [[domains.categories]]
//! name = "vehicles"
//! terms = ["car", "vehicle", "driver"]
//!
//! [[topics]]
//! key = "collision"
//! terms = ["accident", "damage", "repair"]
//! ```

mod concepts;
mod synonyms;
mod topics;

pub use concepts::{ConceptCategory, ConceptDictionary, ConceptDomain};
pub use synonyms::SynonymTable;
pub use topics::TopicTermTable;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// All vocabulary used while grading.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainContext {
    pub synonyms: SynonymTable,
    pub concepts: ConceptDictionary,
    pub topic_terms: TopicTermTable,
}

impl DomainContext {
    /// The built-in tables.
    pub fn builtin() -> Self {
        Self {
            synonyms: SynonymTable::builtin(),
            concepts: ConceptDictionary::builtin(),
            topic_terms: TopicTermTable::builtin(),
        }
    }

    /// Built-in tables extended with the lexicon file at `path`.
    pub fn load_with(path: &Path) -> Result<Self> {
        let lexicon = LexiconFile::load(path)?;
        let mut context = Self::builtin();
        context.extend(lexicon);
        Ok(context)
    }

    /// Merge a lexicon into these tables. Custom domains and topics are
    /// tried before the existing ones.
    pub fn extend(&mut self, lexicon: LexiconFile) {
        for (term, synonyms) in &lexicon.synonyms {
            self.synonyms.insert(term, synonyms);
        }
        self.concepts.prepend(lexicon.domains);
        for topic in lexicon.topics.iter().rev() {
            self.topic_terms.prepend(&topic.key, &topic.terms);
        }
        self.topic_terms.extend_general(&lexicon.general_terms);
    }
}

impl Default for DomainContext {
    fn default() -> Self {
        Self::builtin()
    }
}

/// On-disk lexicon extension.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LexiconFile {
    #[serde(default)]
    pub synonyms: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub domains: Vec<ConceptDomain>,
    #[serde(default)]
    pub topics: Vec<TopicEntry>,
    #[serde(default)]
    pub general_terms: Vec<String>,
}

/// A topic key with its expected vocabulary.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicEntry {
    pub key: String,
    pub terms: Vec<String>,
}

impl LexiconFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read lexicon file: {}", path.display()))?;
        Self::parse_str(&content, path)
    }

    pub fn parse_str(content: &str, source_path: &Path) -> Result<Self> {
        toml::from_str(content)
            .with_context(|| format!("failed to parse lexicon: {}", source_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const LEXICON: &str = r#"
general_terms = ["safety"]

[synonyms]
collision = ["crash", "accident"]

[[domains]]
key = "auto_insurance"
triggers = ["car insurance", "collision"]

[[domains.categories]]
name = "vehicles"
terms = ["car", "vehicle", "driver"]

[[topics]]
key = "collision"
terms = ["accident", "damage", "repair"]

[[topics]]
key = "liability"
terms = ["fault", "injury"]
"#;

    #[test]
    fn parses_lexicon_file() {
        let lexicon = LexiconFile::parse_str(LEXICON, &PathBuf::from("lexicon.toml")).unwrap();
        assert_eq!(lexicon.synonyms["collision"], vec!["crash", "accident"]);
        assert_eq!(lexicon.domains.len(), 1);
        assert_eq!(lexicon.domains[0].categories[0].terms.len(), 3);
        assert_eq!(lexicon.topics.len(), 2);
    }

    #[test]
    fn extend_puts_custom_entries_first() {
        let lexicon = LexiconFile::parse_str(LEXICON, &PathBuf::from("lexicon.toml")).unwrap();
        let mut context = DomainContext::builtin();
        context.extend(lexicon);

        assert!(context.synonyms.are_linked("crash", "collision"));
        // "car insurance" would otherwise select the insurance domain.
        let domain = context.concepts.select("Car Insurance", "What does it cover?");
        assert_eq!(domain.key, "auto_insurance");
        assert_eq!(context.topic_terms.terms_for("collision")[0], "accident");
        assert_eq!(context.topic_terms.terms_for("liability insurance")[0], "fault");
        assert!(context.topic_terms.general().iter().any(|t| t == "safety"));
    }

    #[test]
    fn empty_lexicon_changes_nothing() {
        let mut context = DomainContext::builtin();
        context.extend(LexiconFile::default());
        assert_eq!(context, DomainContext::builtin());
    }

    #[test]
    fn malformed_lexicon_reports_path() {
        let err = LexiconFile::parse_str("domains = 3", &PathBuf::from("bad.toml")).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn load_with_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.toml");
        std::fs::write(&path, LEXICON).unwrap();
        let context = DomainContext::load_with(&path).unwrap();
        assert!(context.synonyms.are_linked("accident", "collision"));
    }
}
