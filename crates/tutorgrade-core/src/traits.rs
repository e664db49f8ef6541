//! The upstream tutor contract.
//!
//! A [`TutorProvider`] answers a question the way a tutor would, giving the
//! grader a reference answer and key points when a sheet does not carry its
//! own. Implementations live in `tutorgrade-providers`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::model::Question;

/// A remote tutor back end.
#[async_trait]
pub trait TutorProvider: Send + Sync {
    /// Human-readable provider name (e.g. "anthropic").
    fn name(&self) -> &str;

    /// Ask the tutor for a reference answer.
    async fn respond(&self, request: &TutorRequest) -> anyhow::Result<TutorResponse>;

    /// List available models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Tutor,
}

/// One earlier message of the tutoring conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Request for a reference answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorRequest {
    /// Model identifier (e.g. "claude-sonnet-4-20250514").
    pub model: String,
    pub subject: String,
    pub topic: String,
    pub question: String,
    /// Prior conversation, oldest first.
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Optional system prompt override.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl TutorRequest {
    pub fn for_question(model: impl Into<String>, question: &Question) -> Self {
        Self {
            model: model.into(),
            subject: question.subject.clone(),
            topic: question.topic.clone(),
            question: question.text.clone(),
            history: Vec::new(),
            max_tokens: 1024,
            temperature: 0.0,
            system_prompt: None,
        }
    }

    /// The system prompt to send, falling back to [`DEFAULT_SYSTEM_PROMPT`].
    pub fn system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    /// The final user message carrying subject, topic and question.
    pub fn user_prompt(&self) -> String {
        let mut prompt = String::new();
        if !self.subject.is_empty() {
            prompt.push_str(&format!("Subject: {}\n", self.subject));
        }
        if !self.topic.is_empty() {
            prompt.push_str(&format!("Topic: {}\n", self.topic));
        }
        prompt.push_str(&format!("Question: {}", self.question));
        prompt
    }
}

/// Response from the tutor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorResponse {
    /// The reference answer.
    pub answer: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    /// The raw response content.
    pub content: String,
    /// Model that actually answered.
    pub model: String,
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub estimated_cost_usd: f64,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
    /// Cost per 1K input tokens in USD.
    pub cost_per_1k_input: f64,
    /// Cost per 1K output tokens in USD.
    pub cost_per_1k_output: f64,
}

/// Default system prompt for tutor providers.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a patient tutor. Answer the learner's question in two or three plain sentences suitable as a model answer. Respond ONLY with a JSON object of the form {\"answer\": \"...\", \"keyPoints\": [\"...\"]} and nothing else.";

/// The answer and key points pulled out of a tutor reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TutorReply {
    #[serde(default)]
    pub answer: String,
    #[serde(default, rename = "keyPoints", alias = "key_points")]
    pub key_points: Vec<String>,
}

/// Parse a tutor reply.
///
/// Accepts a JSON object (bare, or inside a markdown fence, possibly with
/// prose around it); a JSON reply must carry a non-empty answer. Anything
/// that does not parse as JSON is read as plain text: bullet lines
/// become key points and the remaining lines form the answer.
pub fn parse_tutor_reply(content: &str) -> Result<TutorReply, ProviderError> {
    if let Some(json) = extract_json_block(content) {
        if let Ok(reply) = serde_json::from_str::<TutorReply>(json) {
            let answer = reply.answer.trim();
            if answer.is_empty() {
                return Err(ProviderError::MalformedReply(
                    "JSON reply has an empty answer".into(),
                ));
            }
            return Ok(TutorReply {
                answer: answer.to_string(),
                key_points: reply.key_points,
            });
        }
    }

    let mut answer_lines = Vec::new();
    let mut key_points = Vec::new();
    for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with("```") {
            continue;
        }
        match strip_bullet(line) {
            Some(point) => key_points.push(point.to_string()),
            None => answer_lines.push(line),
        }
    }

    let answer = answer_lines.join(" ");
    if answer.is_empty() {
        return Err(ProviderError::MalformedReply(
            "reply contained no answer text".into(),
        ));
    }
    Ok(TutorReply { answer, key_points })
}

fn strip_bullet(line: &str) -> Option<&str> {
    for marker in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest.trim());
        }
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return Some(rest.trim());
        }
    }
    None
}

/// Find the JSON object in a reply.
///
/// Prefers the contents of a ```json (or bare ```) fence; otherwise takes
/// the span from the first `{` to the last `}`.
pub fn extract_json_block(text: &str) -> Option<&str> {
    let mut rest = text;
    while let Some(start) = rest.find("```") {
        let after = &rest[start + 3..];
        let body_start = after.find('\n').map(|i| i + 1).unwrap_or(after.len());
        let lang = after[..body_start].trim().to_lowercase();
        let body = &after[body_start..];
        let end = body.find("```").unwrap_or(body.len());
        let block = body[..end].trim();
        if (lang.is_empty() || lang == "json") && block.starts_with('{') {
            return Some(block);
        }
        if end == body.len() {
            break;
        }
        rest = &body[end + 3..];
    }

    let open = text.find('{')?;
    let close = text.rfind('}')?;
    (close > open).then(|| &text[open..=close])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json() {
        let reply = parse_tutor_reply(
            r#"{"answer": "A premium is what you pay.", "keyPoints": ["Paid regularly"]}"#,
        )
        .unwrap();
        assert_eq!(reply.answer, "A premium is what you pay.");
        assert_eq!(reply.key_points, vec!["Paid regularly"]);
    }

    #[test]
    fn parses_fenced_json_with_prose() {
        let content = "Sure! Here you go:\n\n```json\n{\"answer\": \"Claims request payment.\", \"key_points\": []}\n```\nHope that helps.";
        let reply = parse_tutor_reply(content).unwrap();
        assert_eq!(reply.answer, "Claims request payment.");
        assert!(reply.key_points.is_empty());
    }

    #[test]
    fn skips_non_json_fences() {
        let content = "```python\nprint('x')\n```\n```json\n{\"answer\": \"ok\"}\n```";
        assert_eq!(extract_json_block(content), Some("{\"answer\": \"ok\"}"));
    }

    #[test]
    fn unclosed_fence_still_found() {
        let content = "```json\n{\"answer\": \"cut off\"}";
        assert_eq!(parse_tutor_reply(content).unwrap().answer, "cut off");
    }

    #[test]
    fn plain_text_with_bullets() {
        let content = "Inflation is a general rise in prices.\n\n- Prices go up\n* Money buys less\n1. Central banks respond";
        let reply = parse_tutor_reply(content).unwrap();
        assert_eq!(reply.answer, "Inflation is a general rise in prices.");
        assert_eq!(
            reply.key_points,
            vec!["Prices go up", "Money buys less", "Central banks respond"]
        );
    }

    #[test]
    fn json_with_empty_answer_is_malformed() {
        let err = parse_tutor_reply(r#"{"answer": "  ", "keyPoints": ["x"]}"#).unwrap_err();
        assert!(err.to_string().contains("empty answer"));
    }

    #[test]
    fn braces_in_prose_are_not_json() {
        let reply = parse_tutor_reply("Sets are written {a, b} in math.").unwrap();
        assert_eq!(reply.answer, "Sets are written {a, b} in math.");
    }

    #[test]
    fn empty_reply_is_malformed() {
        let err = parse_tutor_reply("  \n- only a bullet\n").unwrap_err();
        assert!(matches!(err, ProviderError::MalformedReply(_)));
    }

    #[test]
    fn request_prompts() {
        let question = Question::new("What is a claim?")
            .with_topic("Claims")
            .with_subject("Insurance");
        let request = TutorRequest::for_question("tutor-1", &question);
        assert_eq!(
            request.user_prompt(),
            "Subject: Insurance\nTopic: Claims\nQuestion: What is a claim?"
        );
        assert_eq!(request.system_prompt(), DEFAULT_SYSTEM_PROMPT);
    }
}
