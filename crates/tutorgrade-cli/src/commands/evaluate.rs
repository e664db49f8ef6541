//! The `tutorgrade evaluate` command.

use std::path::PathBuf;

use anyhow::Result;

use tutorgrade_core::{Evaluation, Question, ReferenceAnswer, UserAnswer};
use tutorgrade_providers::config::load_config_from;

pub struct EvaluateArgs {
    pub question: String,
    pub reference: String,
    pub answer: String,
    pub topic: String,
    pub subject: String,
    pub config: Option<PathBuf>,
    pub lexicon: Option<PathBuf>,
    pub format: String,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let evaluator = super::build_evaluator(&config, args.lexicon.as_deref())?;

    let question = Question::new(args.question)
        .with_topic(args.topic)
        .with_subject(args.subject);
    let evaluation = evaluator.evaluate(
        &question,
        &ReferenceAnswer::new(args.reference),
        &UserAnswer::new(args.answer),
    )?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&evaluation)?),
        "text" => print_text(&evaluation),
        other => anyhow::bail!("unknown format '{other}', expected text or json"),
    }

    Ok(())
}

fn print_text(evaluation: &Evaluation) {
    let Some(result) = evaluation.graded() else {
        println!("Retry: {}", evaluation.feedback());
        return;
    };

    println!("Tier:  {}", result.tier);
    println!("Score: {:.1}%", result.score * 100.0);

    let s = &result.signals;
    println!(
        "Signals: semantic {:.2}, conceptual {:.2}, multi-part {:.2}, direct {:.2}, jaccard {:.2}",
        s.semantic, s.conceptual, s.multi_part, s.direct, s.jaccard
    );
    if !result.matched_concepts.is_empty() {
        println!("Matched: {}", result.matched_concepts.join(", "));
    }
    if result.generic_reference {
        println!("Note: placeholder reference, graded by topic vocabulary");
    }
    for part in &result.partial_scores {
        println!("  [{:>3.0}%] {}", part.score * 100.0, part.clause);
    }
    println!("\n{}", result.feedback);
}
