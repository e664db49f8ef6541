pub mod compare;
pub mod evaluate;
pub mod grade;
pub mod init;
pub mod list_models;
pub mod validate;

use std::path::Path;

use anyhow::Result;

use tutorgrade_core::{DomainContext, Evaluator};
use tutorgrade_providers::TutorgradeConfig;

/// Build the evaluator from the `[scoring]` table and an optional lexicon.
///
/// `lexicon` overrides the path named in the config file.
pub fn build_evaluator(config: &TutorgradeConfig, lexicon: Option<&Path>) -> Result<Evaluator> {
    let evaluator = Evaluator::new(config.scoring.clone())?;
    let context = match lexicon.or(config.lexicon.as_deref()) {
        Some(path) => DomainContext::load_with(path)?,
        None => DomainContext::builtin(),
    };
    Ok(evaluator.with_context(context))
}
