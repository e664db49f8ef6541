//! tutorgrade-providers: remote tutor back ends.
//!
//! Implements the `TutorProvider` trait for Anthropic, OpenAI-compatible and
//! Ollama endpoints so the grader can fetch reference answers for sheet items
//! that do not carry one.

pub mod anthropic;
pub mod config;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{create_provider, load_config, load_config_from, ProviderConfig, TutorgradeConfig};
pub use tutorgrade_core::error::ProviderError;
