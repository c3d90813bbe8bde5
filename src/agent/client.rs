//! Provider registry and factory.
//!
//! Maps the configured provider name to a concrete [`LlmProvider`]. The
//! service receives the provider as an injected `Arc`, so tests bypass
//! this factory entirely and hand in stubs.

use std::sync::Arc;

use crate::agent::config::AgentConfig;
use crate::agent::provider::LlmProvider;
use crate::agent::providers::OpenAiProvider;
use crate::error::AgentError;

/// Creates an [`LlmProvider`] from the configured provider name.
///
/// `"openai"` (the default) covers any `OpenAI`-compatible API; point
/// [`AgentConfig::base_url`] at proxies or self-hosted backends.
///
/// # Errors
///
/// Returns [`AgentError::UnsupportedProvider`] for unknown names.
pub fn create_provider(config: &AgentConfig) -> Result<Arc<dyn LlmProvider>, AgentError> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiProvider::new(config))),
        other => Err(AgentError::UnsupportedProvider {
            name: other.to_string(),
        }),
    }
}
