//! Mock provider for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use tutorgrade_core::traits::{
    parse_tutor_reply, ModelInfo, TokenUsage, TutorProvider, TutorRequest, TutorResponse,
};

/// A mock tutor for exercising the grading engine without real API calls.
///
/// Replies are chosen by matching a key against the request's topic and
/// question, and are parsed exactly like a real provider's reply.
pub struct MockProvider {
    /// Map of topic or question substring → raw reply.
    responses: HashMap<String, String>,
    /// Reply used when nothing matches.
    default_response: String,
    call_count: AtomicU32,
    last_request: Mutex<Option<TutorRequest>>,
}

impl MockProvider {
    /// Create a mock with the given key → reply mappings.
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            default_response: r#"{"answer": "I am not sure about that topic.", "keyPoints": []}"#
                .to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same reply.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            responses: HashMap::new(),
            default_response: response.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The last request made to this provider.
    pub fn last_request(&self) -> Option<TutorRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl TutorProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn respond(&self, request: &TutorRequest) -> anyhow::Result<TutorResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        let haystack = format!("{} {}", request.topic, request.question).to_lowercase();
        let content = self
            .responses
            .iter()
            .find(|(key, _)| haystack.contains(&key.to_lowercase()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone());

        let reply = parse_tutor_reply(&content)?;
        let prompt_tokens = (request.user_prompt().len() / 4) as u32; // Rough estimate
        let completion_tokens = (content.len() / 4) as u32;

        Ok(TutorResponse {
            answer: reply.answer,
            key_points: reply.key_points,
            content,
            model: request.model.clone(),
            token_usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
                estimated_cost_usd: 0.0,
            },
            latency_ms: 1,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "mock-model".into(),
            name: "Mock Model".into(),
            provider: "mock".into(),
            max_context: 100_000,
            cost_per_1k_input: 0.0,
            cost_per_1k_output: 0.0,
        }]
    }
}
