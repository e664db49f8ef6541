//! Grading report types with JSON persistence and regression detection.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Tier;
use crate::results::{GradedItem, ItemFailure};
use crate::statistics::AggregateStats;

/// A complete grading report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub sheet: SheetSummary,
    /// `provider/model` used for missing references, if any.
    #[serde(default)]
    pub model: Option<String>,
    pub items: Vec<GradedItem>,
    #[serde(default)]
    pub failures: Vec<ItemFailure>,
    pub aggregate: AggregateStats,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Summary of an answer sheet (without the items).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subject: String,
    pub item_count: usize,
}

impl GradingReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GradingReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this report against a baseline to detect score regressions.
    ///
    /// Items are matched by ID. Retry prompts have no score and are skipped.
    pub fn compare(&self, baseline: &GradingReport, threshold: f64) -> RegressionReport {
        let score_map = |report: &GradingReport| -> HashMap<String, (f64, Tier)> {
            report
                .items
                .iter()
                .filter_map(|item| {
                    let result = item.evaluation.graded()?;
                    Some((item.item_id.clone(), (result.score, result.tier)))
                })
                .collect()
        };

        let baseline_scores = score_map(baseline);
        let current_scores = score_map(self);

        let mut regressions = Vec::new();
        let mut improvements = Vec::new();
        let mut unchanged = 0usize;
        let mut new_items = 0usize;

        let mut ids: Vec<&String> = current_scores.keys().collect();
        ids.sort();

        for id in ids {
            let (current, current_tier) = current_scores[id];
            let Some(&(baseline_score, baseline_tier)) = baseline_scores.get(id) else {
                new_items += 1;
                continue;
            };
            let change = ScoreChange {
                item_id: id.clone(),
                baseline_score,
                current_score: current,
                baseline_tier,
                current_tier,
                delta: current - baseline_score,
            };
            if change.delta < -threshold {
                regressions.push(change);
            } else if change.delta > threshold {
                improvements.push(change);
            } else {
                unchanged += 1;
            }
        }

        let removed_items = baseline_scores
            .keys()
            .filter(|k| !current_scores.contains_key(*k))
            .count();

        RegressionReport {
            regressions,
            improvements,
            unchanged,
            new_items,
            removed_items,
        }
    }
}

/// Result of comparing two reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionReport {
    /// Items whose score went down.
    pub regressions: Vec<ScoreChange>,
    /// Items whose score went up.
    pub improvements: Vec<ScoreChange>,
    /// Items with no significant change.
    pub unchanged: usize,
    /// Items in current but not baseline.
    pub new_items: usize,
    /// Items in baseline but not current.
    pub removed_items: usize,
}

/// A score change for one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreChange {
    pub item_id: String,
    pub baseline_score: f64,
    pub current_score: f64,
    pub baseline_tier: Tier,
    pub current_tier: Tier,
    pub delta: f64,
}

impl ScoreChange {
    pub fn tier_changed(&self) -> bool {
        self.baseline_tier != self.current_tier
    }
}

impl RegressionReport {
    /// Format the regression report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} regressions, {} improvements, {} unchanged, {} new, {} removed\n\n",
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged,
            self.new_items,
            self.removed_items
        ));

        let mut table = |title: &str, changes: &[ScoreChange]| {
            if changes.is_empty() {
                return;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Item | Baseline | Current | Delta | Tier |\n");
            md.push_str("|------|----------|---------|-------|------|\n");
            for c in changes {
                let tier = if c.tier_changed() {
                    format!("{} → {}", c.baseline_tier, c.current_tier)
                } else {
                    c.current_tier.to_string()
                };
                md.push_str(&format!(
                    "| {} | {:.1}% | {:.1}% | {:+.1}% | {} |\n",
                    c.item_id,
                    c.baseline_score * 100.0,
                    c.current_score * 100.0,
                    c.delta * 100.0,
                    tier
                ));
            }
            md.push('\n');
        };

        table("Regressions", self.regressions.as_slice());
        table("Improvements", self.improvements.as_slice());

        md
    }

    /// Returns true if there are any regressions.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}
