//! TOML answer sheet parser.
//!
//! Loads answer sheets from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::generic::GenericAnswerDetector;
use crate::model::{AnswerSheet, SheetItem, Tier};
use crate::text::normalize;

/// Intermediate TOML structure for parsing answer sheet files.
#[derive(Debug, Deserialize)]
struct TomlSheetFile {
    sheet: TomlSheetHeader,
    #[serde(default)]
    items: Vec<TomlSheetItem>,
}

#[derive(Debug, Deserialize)]
struct TomlSheetHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    subject: String,
}

#[derive(Debug, Deserialize)]
struct TomlSheetItem {
    id: String,
    #[serde(default)]
    topic: String,
    question: String,
    #[serde(default)]
    reference: Option<String>,
    #[serde(default)]
    key_points: Vec<String>,
    #[serde(default)]
    answer: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    expected_tier: Option<String>,
}

/// Parse a single TOML file into an `AnswerSheet`.
pub fn parse_sheet(path: &Path) -> Result<AnswerSheet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answer sheet: {}", path.display()))?;

    parse_sheet_str(&content, path)
}

/// Parse a TOML string into an `AnswerSheet` (useful for testing).
pub fn parse_sheet_str(content: &str, source_path: &Path) -> Result<AnswerSheet> {
    let parsed: TomlSheetFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let items = parsed
        .items
        .into_iter()
        .map(|item| {
            let expected_tier = item
                .expected_tier
                .map(|t| {
                    t.parse::<Tier>()
                        .map_err(|e| anyhow::anyhow!("item {}: {}", item.id, e))
                })
                .transpose()?;

            Ok(SheetItem {
                id: item.id,
                topic: item.topic,
                question: item.question,
                reference: item.reference.filter(|r| !r.trim().is_empty()),
                key_points: item.key_points,
                answer: item.answer,
                tags: item.tags,
                expected_tier,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AnswerSheet {
        id: parsed.sheet.id,
        name: parsed.sheet.name,
        description: parsed.sheet.description,
        subject: parsed.sheet.subject,
        items,
    })
}

/// Recursively load all `.toml` answer sheets from a directory.
pub fn load_sheet_directory(dir: &Path) -> Result<Vec<AnswerSheet>> {
    let mut sheets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            sheets.extend(load_sheet_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_sheet(&path) {
                Ok(sheet) => sheets.push(sheet),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(sheets)
}

/// Load one sheet file, or every sheet under a directory.
pub fn load_sheets(path: &Path) -> Result<Vec<AnswerSheet>> {
    if path.is_dir() {
        load_sheet_directory(path)
    } else {
        Ok(vec![parse_sheet(path)?])
    }
}

/// A warning from answer sheet validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The item ID (if applicable).
    pub item_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate an answer sheet for common issues.
pub fn validate_sheet(sheet: &AnswerSheet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let warn = |item: &SheetItem, message: &str| ValidationWarning {
        item_id: Some(item.id.clone()),
        message: message.to_string(),
    };

    if sheet.items.is_empty() {
        warnings.push(ValidationWarning {
            item_id: None,
            message: "sheet has no items".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for item in &sheet.items {
        if !seen_ids.insert(&item.id) {
            warnings.push(warn(item, &format!("duplicate item ID: {}", item.id)));
        }
    }

    let detector = GenericAnswerDetector::default();
    for item in &sheet.items {
        if item.question.trim().is_empty() {
            warnings.push(warn(item, "question is empty"));
        }
        if normalize(&item.answer).is_empty() {
            warnings.push(warn(item, "answer is empty and will get a retry prompt"));
        }
        match &item.reference {
            None => warnings.push(warn(
                item,
                "no reference answer; one will be fetched or looked up",
            )),
            Some(reference) if normalize(reference).is_empty() => {
                warnings.push(warn(item, "reference answer has no content"))
            }
            Some(reference) if detector.is_generic(&normalize(reference)) => warnings.push(warn(
                item,
                "reference answer is a placeholder; grading falls back to topic vocabulary",
            )),
            Some(_) => {}
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[sheet]
id = "insurance-basics"
name = "Insurance Basics"
description = "Week one quiz"
subject = "Insurance"

[[items]]
id = "underwriting"
topic = "Underwriting"
question = "What is underwriting?"
reference = "Underwriting is the process insurers use to evaluate risk and decide whether to issue a policy."
key_points = ["Risk evaluation", "Approval decision"]
answer = "it's how insurers decide if they should give you a policy by looking at risk"
tags = ["definitions"]
expected_tier = "partially_correct"
"#;

    #[test]
    fn parse_valid_toml() {
        let sheet = parse_sheet_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(sheet.id, "insurance-basics");
        assert_eq!(sheet.subject, "Insurance");
        assert_eq!(sheet.items.len(), 1);
        let item = &sheet.items[0];
        assert_eq!(item.topic, "Underwriting");
        assert_eq!(item.key_points.len(), 2);
        assert_eq!(item.expected_tier, Some(Tier::PartiallyCorrect));
        assert!(validate_sheet(&sheet).is_empty());
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[sheet]
id = "minimal"
name = "Minimal"

[[items]]
id = "q1"
question = "What is a premium?"
reference = "   "
"#;
        let sheet = parse_sheet_str(toml, &PathBuf::from("test.toml")).unwrap();
        let item = &sheet.items[0];
        assert!(item.reference.is_none());
        assert!(item.answer.is_empty());
        assert!(item.tags.is_empty());
        assert_eq!(item.expected_tier, None);
    }

    #[test]
    fn parse_rejects_unknown_tier() {
        let toml = r#"
[sheet]
id = "bad-tier"
name = "Bad Tier"

[[items]]
id = "q1"
question = "What is a premium?"
answer = "a payment"
expected_tier = "mostly"
"#;
        let err = parse_sheet_str(toml, &PathBuf::from("test.toml")).unwrap_err();
        assert!(err.to_string().contains("q1"));
    }

    #[test]
    fn validate_reports_problems() {
        let toml = r#"
[sheet]
id = "problems"
name = "Problems"

[[items]]
id = "same"
question = "What is risk management?"
reference = "Risk management is an important concept in insurance. Understanding the key principles helps."
answer = "identify and reduce risk"

[[items]]
id = "same"
question = " "
answer = "..."
"#;
        let sheet = parse_sheet_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_sheet(&sheet);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("duplicate")));
        assert!(messages.iter().any(|m| m.contains("placeholder")));
        assert!(messages.iter().any(|m| m.contains("question is empty")));
        assert!(messages.iter().any(|m| m.contains("retry prompt")));
        assert!(messages.iter().any(|m| m.contains("no reference")));
    }

    #[test]
    fn validate_empty_sheet() {
        let toml = "[sheet]\nid = \"empty\"\nname = \"Empty\"\n";
        let sheet = parse_sheet_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_sheet(&sheet);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].item_id.is_none());
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        let result = parse_sheet_str(bad, &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("b.toml"), "not toml [").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(
            nested.join("c.toml"),
            VALID_TOML.replace("insurance-basics", "nested-sheet"),
        )
        .unwrap();

        let sheets = load_sheet_directory(dir.path()).unwrap();
        let ids: Vec<&str> = sheets.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["insurance-basics", "nested-sheet"]);
    }

    #[test]
    fn load_sheets_accepts_file_or_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("sheet.toml");
        std::fs::write(&file, VALID_TOML).unwrap();
        assert_eq!(load_sheets(&file).unwrap().len(), 1);
        assert_eq!(load_sheets(dir.path()).unwrap().len(), 1);
        assert!(load_sheets(&dir.path().join("missing.toml")).is_err());
    }
}
