//! Batch grading of answer sheets.
//!
//! Grades every item of a sheet with bounded parallelism. Items without a
//! reference answer get one from the upstream tutor (with retries) or, when
//! that is unavailable, from the local fallback table.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::error::ProviderError;
use crate::evaluator::Evaluator;
use crate::fallback::FallbackReferences;
use crate::model::{AnswerSheet, SheetItem};
use crate::report::{GradingReport, SheetSummary};
use crate::results::{GradedItem, ItemFailure, ReferenceSource};
use crate::statistics::compute_aggregate_stats;
use crate::text::normalize;
use crate::traits::{TokenUsage, TutorProvider, TutorRequest, TutorResponse};

/// Configuration for the grading engine.
#[derive(Debug, Clone)]
pub struct GradingConfig {
    /// Maximum items graded at once.
    pub parallelism: usize,
    /// Temperature for reference generation.
    pub temperature: f64,
    /// Max tokens for reference generation.
    pub max_tokens: u32,
    /// Retries on transient provider errors.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub retry_delay: Duration,
    /// Optional system prompt override.
    pub system_prompt_override: Option<String>,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            parallelism: 4,
            temperature: 0.0,
            max_tokens: 1024,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            system_prompt_override: None,
        }
    }
}

/// Which model supplies missing references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    /// Provider name (e.g. "anthropic").
    pub provider: String,
    /// Model identifier (e.g. "claude-sonnet-4-20250514").
    pub model: String,
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.provider, self.model)
    }
}

impl std::str::FromStr for ModelSpec {
    type Err = String;

    /// Parse `provider/model`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((provider, model)) if !provider.is_empty() && !model.is_empty() => Ok(Self {
                provider: provider.to_string(),
                model: model.to_string(),
            }),
            _ => Err(format!("invalid model spec '{s}', expected provider/model")),
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_item_start(&self, item_id: &str);
    fn on_item_graded(&self, item: &GradedItem);
    fn on_item_error(&self, item_id: &str, error: &str);
    fn on_sheet_complete(&self, total: usize, graded: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_item_start(&self, _: &str) {}
    fn on_item_graded(&self, _: &GradedItem) {}
    fn on_item_error(&self, _: &str, _: &str) {}
    fn on_sheet_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// A reference answer and where it came from.
struct ResolvedReference {
    text: String,
    key_points: Vec<String>,
    source: ReferenceSource,
    token_usage: Option<TokenUsage>,
    latency_ms: u64,
}

/// Grades answer sheets.
pub struct GradingEngine {
    evaluator: Arc<Evaluator>,
    provider: Option<(Arc<dyn TutorProvider>, ModelSpec)>,
    fallback: Arc<FallbackReferences>,
    config: GradingConfig,
}

impl GradingEngine {
    pub fn new(evaluator: Evaluator, config: GradingConfig) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
            provider: None,
            fallback: Arc::new(FallbackReferences::builtin()),
            config,
        }
    }

    /// Fetch missing references from `provider` using `spec.model`.
    pub fn with_provider(mut self, provider: Arc<dyn TutorProvider>, spec: ModelSpec) -> Self {
        self.provider = Some((provider, spec));
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackReferences) -> Self {
        self.fallback = Arc::new(fallback);
        self
    }

    /// Grade every item of `sheet`.
    pub async fn grade(
        &self,
        sheet: &AnswerSheet,
        progress: &dyn ProgressReporter,
    ) -> Result<GradingReport> {
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));

        let mut futures = FuturesUnordered::new();

        for item in &sheet.items {
            let semaphore = Arc::clone(&semaphore);
            let evaluator = Arc::clone(&self.evaluator);
            let fallback = Arc::clone(&self.fallback);
            let provider = self.provider.clone();
            let config = self.config.clone();
            let subject = sheet.subject.clone();
            let item = item.clone();

            futures.push(async move {
                let item_id = item.id.clone();
                let inner = async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                    progress.on_item_start(&item.id);

                    let reference =
                        resolve_reference(&item, &subject, provider.as_ref(), &fallback, &config)
                            .await;
                    let evaluation = evaluator.evaluate(
                        &item.to_question(&subject),
                        &crate::model::ReferenceAnswer::new(reference.text.clone()),
                        &item.user_answer(),
                    )?;

                    Ok::<_, anyhow::Error>(GradedItem {
                        item_id: item.id.clone(),
                        topic: item.topic.clone(),
                        question: item.question.clone(),
                        answer: item.answer.clone(),
                        reference: reference.text,
                        reference_source: reference.source,
                        key_points: reference.key_points,
                        evaluation,
                        expected_tier: item.expected_tier,
                        tags: item.tags.clone(),
                        token_usage: reference.token_usage,
                        reference_latency_ms: reference.latency_ms,
                    })
                };
                (item_id, inner.await)
            });
        }

        let mut items = Vec::new();
        let mut failures = Vec::new();
        let total = futures.len();

        while let Some((item_id, result)) = futures.next().await {
            match result {
                Ok(graded) => {
                    progress.on_item_graded(&graded);
                    items.push(graded);
                }
                Err(e) => {
                    tracing::error!("grading failed for {item_id}: {e:#}");
                    progress.on_item_error(&item_id, &format!("{e:#}"));
                    failures.push(ItemFailure {
                        item_id,
                        error: format!("{e:#}"),
                    });
                }
            }
        }

        // Keep sheet order regardless of completion order.
        let position = |id: &str| sheet.items.iter().position(|i| i.id == id);
        items.sort_by_key(|i| position(i.item_id.as_str()));
        failures.sort_by_key(|f| position(f.item_id.as_str()));

        let elapsed = start.elapsed();
        progress.on_sheet_complete(total, items.len(), failures.len(), elapsed);

        let aggregate = compute_aggregate_stats(&items, failures.len());

        Ok(GradingReport {
            id: run_id,
            created_at: chrono::Utc::now(),
            sheet: SheetSummary {
                id: sheet.id.clone(),
                name: sheet.name.clone(),
                subject: sheet.subject.clone(),
                item_count: sheet.items.len(),
            },
            model: self.provider.as_ref().map(|(_, spec)| spec.to_string()),
            items,
            failures,
            aggregate,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}

/// Sheet reference, else a non-empty provider reference, else the fallback table.
async fn resolve_reference(
    item: &SheetItem,
    subject: &str,
    provider: Option<&(Arc<dyn TutorProvider>, ModelSpec)>,
    fallback: &FallbackReferences,
    config: &GradingConfig,
) -> ResolvedReference {
    if let Some(text) = &item.reference {
        return ResolvedReference {
            text: text.clone(),
            key_points: item.key_points.clone(),
            source: ReferenceSource::Sheet,
            token_usage: None,
            latency_ms: 0,
        };
    }

    let question = item.to_question(subject);

    if let Some((provider, spec)) = provider {
        let mut request = TutorRequest::for_question(spec.model.clone(), &question);
        request.max_tokens = config.max_tokens;
        request.temperature = config.temperature;
        request.system_prompt = config.system_prompt_override.clone();

        match fetch_with_retries(provider.as_ref(), &request, config).await {
            Ok(response) if normalize(&response.answer).is_empty() => {
                tracing::warn!(
                    "tutor returned an empty reference for {}, using local table",
                    item.id
                );
            }
            Ok(response) => {
                return ResolvedReference {
                    text: response.answer,
                    key_points: response.key_points,
                    source: ReferenceSource::Provider,
                    token_usage: Some(response.token_usage),
                    latency_ms: response.latency_ms,
                };
            }
            Err(e) => {
                tracing::warn!(
                    "reference generation failed for {}, using local table: {e:#}",
                    item.id
                );
            }
        }
    }

    let local = fallback.reference_for(&question);
    ResolvedReference {
        text: local.answer,
        key_points: local.key_points,
        source: if local.placeholder {
            ReferenceSource::Placeholder
        } else {
            ReferenceSource::Fallback
        },
        token_usage: None,
        latency_ms: 0,
    }
}

/// Call the provider, retrying transient errors with exponential backoff.
async fn fetch_with_retries(
    provider: &dyn TutorProvider,
    request: &TutorRequest,
    config: &GradingConfig,
) -> Result<TutorResponse> {
    let mut last_error = None;
    let mut retry_delay = config.retry_delay;
    for retry in 0..=config.max_retries {
        if retry > 0 {
            tokio::time::sleep(retry_delay).await;
            retry_delay = (retry_delay * 2).min(Duration::from_secs(60));
        }
        match provider.respond(request).await {
            Ok(response) => return Ok(response),
            Err(e) => {
                if let Some(provider_err) = e.downcast_ref::<ProviderError>() {
                    if provider_err.is_permanent() {
                        return Err(e);
                    }
                    // Use provider's retry-after hint if available
                    if let Some(ms) = provider_err.retry_after_ms() {
                        retry_delay = Duration::from_millis(ms);
                    }
                }
                tracing::debug!("attempt {} failed: {e:#}", retry + 1);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("unknown error")))
}
