//! Pluggable LLM provider trait.
//!
//! Implementations translate provider-agnostic [`ChatRequest`]/[`ChatResponse`]
//! into provider-specific SDK calls. This keeps the workflow logic decoupled
//! from any particular LLM vendor and lets tests substitute deterministic
//! stubs.

use async_trait::async_trait;

use super::message::{ChatRequest, ChatResponse};
use crate::error::AgentError;

/// Trait for LLM provider backends.
///
/// Implementations handle the transport layer for a specific provider while
/// presenting a uniform interface to the orchestration core. Retry and
/// rate-limiting policy live above this trait; implementations only
/// classify failures (throttling vs. everything else).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., `"openai"`).
    fn name(&self) -> &'static str;

    /// Executes a single chat completion request.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Throttled`] when the provider signals a rate
    /// or quota limit, and [`AgentError::ApiRequest`] for any other API,
    /// transport, or parse failure.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError>;

    /// Lists model identifiers available from the provider.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiRequest`] on API failures. Callers may fall
    /// back to a curated default list.
    async fn list_models(&self) -> Result<Vec<String>, AgentError>;
}
