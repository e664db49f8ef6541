//! The `tutorgrade grade` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use tutorgrade_core::engine::{GradingConfig, GradingEngine, ModelSpec, ProgressReporter};
use tutorgrade_core::parser;
use tutorgrade_core::report::GradingReport;
use tutorgrade_core::results::GradedItem;
use tutorgrade_providers::config::load_config_from;
use tutorgrade_providers::create_provider;

pub struct GradeArgs {
    pub sheet: PathBuf,
    pub config: Option<PathBuf>,
    pub model: Option<String>,
    pub parallelism: Option<usize>,
    pub offline: bool,
    pub output: Option<PathBuf>,
    pub filter: Option<String>,
}

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_item_start(&self, item_id: &str) {
        eprintln!("  Grading: {item_id}");
    }

    fn on_item_graded(&self, item: &GradedItem) {
        let outcome = match item.evaluation.graded() {
            Some(result) => format!("{} {:.1}%", result.tier, result.score * 100.0),
            None => "retry prompt".to_string(),
        };
        eprintln!(
            "  Done: {} [{}] {outcome}",
            item.item_id, item.reference_source
        );
    }

    fn on_item_error(&self, item_id: &str, error: &str) {
        eprintln!("  ERROR: {item_id}: {error}");
    }

    fn on_sheet_complete(&self, total: usize, graded: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {graded}/{total} graded, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(args: GradeArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let parallelism = args.parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

    let mut sheets = parser::load_sheets(&args.sheet)?;
    anyhow::ensure!(
        !sheets.is_empty(),
        "no answer sheets found in {}",
        args.sheet.display()
    );

    if let Some(filter_tags) = &args.filter {
        let tags: Vec<&str> = filter_tags.split(',').map(|s| s.trim()).collect();
        for sheet in &mut sheets {
            sheet
                .items
                .retain(|item| item.tags.iter().any(|t| tags.contains(&t.as_str())));
        }
    }

    let evaluator = super::build_evaluator(&config, None)?;
    let grading_config = GradingConfig {
        parallelism,
        temperature: config.default_temperature,
        max_tokens: 1024,
        max_retries: config.max_retries,
        retry_delay: Duration::from_millis(config.retry_delay_ms),
        system_prompt_override: None,
    };
    let mut engine = GradingEngine::new(evaluator, grading_config);

    if !args.offline {
        let spec = match &args.model {
            Some(m) => m.parse::<ModelSpec>().map_err(anyhow::Error::msg)?,
            None => ModelSpec {
                provider: config.default_provider.clone(),
                model: config.default_model.clone(),
            },
        };
        match config.providers.get(&spec.provider) {
            Some(provider_config) => {
                let provider = create_provider(provider_config)?;
                engine = engine.with_provider(Arc::from(provider), spec);
            }
            None if args.model.is_some() => anyhow::bail!(
                "provider '{}' not found in config. Available: {:?}",
                spec.provider,
                config.providers.keys().collect::<Vec<_>>()
            ),
            None => tracing::info!(
                "provider '{}' not configured, missing references come from the local table",
                spec.provider
            ),
        }
    }

    let output = args.output.unwrap_or_else(|| config.output_dir.clone());
    let reporter = ConsoleReporter;

    for sheet in &sheets {
        eprintln!(
            "tutorgrade v{}: grading {} items of {}",
            env!("CARGO_PKG_VERSION"),
            sheet.items.len(),
            sheet.name
        );
        eprintln!();

        let report = engine.grade(sheet, &reporter).await?;
        print_summary(&report);

        std::fs::create_dir_all(&output)?;
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
        let path = output.join(format!("{}-{timestamp}.json", sheet.id));
        report.save_json(&path)?;
        eprintln!("Results saved to: {}", path.display());
    }

    Ok(())
}

fn print_summary(report: &GradingReport) {
    use comfy_table::{Cell, Table};

    let mut items = Table::new();
    items.set_header(vec!["Item", "Topic", "Tier", "Score", "Reference"]);
    for item in &report.items {
        let (tier, score) = match item.evaluation.graded() {
            Some(result) => (
                result.tier.to_string(),
                format!("{:.1}%", result.score * 100.0),
            ),
            None => ("retry".to_string(), "-".to_string()),
        };
        items.add_row(vec![
            Cell::new(&item.item_id),
            Cell::new(&item.topic),
            Cell::new(tier),
            Cell::new(score),
            Cell::new(item.reference_source),
        ]);
    }
    for failure in &report.failures {
        items.add_row(vec![
            Cell::new(&failure.item_id),
            Cell::new(""),
            Cell::new("error"),
            Cell::new("-"),
            Cell::new(&failure.error),
        ]);
    }
    println!("{items}");

    let stats = &report.aggregate;
    let mut summary = Table::new();
    summary.set_header(vec![
        "Graded", "Correct", "Partial", "Incorrect", "Retries", "Mean", "Credit", "Cost",
    ]);
    summary.add_row(vec![
        Cell::new(stats.tiers.total()),
        Cell::new(stats.tiers.correct),
        Cell::new(stats.tiers.partially_correct),
        Cell::new(stats.tiers.incorrect),
        Cell::new(stats.retries),
        Cell::new(format!("{:.1}%", stats.mean_score * 100.0)),
        Cell::new(format!("{:.1}%", stats.credit_rate * 100.0)),
        Cell::new(format!("${:.4}", stats.total_cost_usd)),
    ]);
    println!("{summary}");

    if let Some(agreement) = &stats.agreement {
        println!(
            "Agreement with expected tiers: {}/{} ({:.1}%)",
            agreement.agreed,
            agreement.checked,
            agreement.rate * 100.0
        );
    }
}
