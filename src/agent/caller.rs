//! Retrying model caller.
//!
//! Wraps a single provider invocation with bounded exponential-backoff
//! retry on throttling and normalizes token accounting. The retry control
//! flow is an explicit state machine driven by `tokio::time::sleep`, so a
//! backoff suspends only the current request's task — concurrent requests
//! keep running.
//!
//! Non-throttling provider failures are never retried; they surface
//! immediately with the underlying cause. Throttling that persists through
//! every attempt surfaces as [`AgentError::QuotaExceeded`].

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::config::AgentConfig;
use super::message::{ChatRequest, TokenUsage, system_message, user_message};
use super::provider::LlmProvider;
use crate::error::AgentError;

/// Retry progression for a single invocation.
#[derive(Debug, Clone, Copy)]
enum RetryState {
    /// About to issue attempt `attempt` (1-based).
    Attempting { attempt: u32 },
    /// Attempt `attempt` was throttled; sleep before the next one.
    Backoff { attempt: u32 },
}

/// Issues provider calls with timeout, throttle retry, and usage
/// normalization.
pub struct ModelCaller {
    provider: Arc<dyn LlmProvider>,
    /// Maximum attempts per invocation (first try + retries).
    max_attempts: u32,
    /// Base backoff delay, doubled after each throttled attempt.
    base_delay: Duration,
    /// Per-call timeout.
    timeout: Duration,
    /// Character-per-token divisor for estimated usage.
    estimate_divisor: usize,
    /// Sampling temperature passed through to the provider.
    temperature: Option<f32>,
}

impl ModelCaller {
    /// Creates a caller from the provider and configuration.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, config: &AgentConfig) -> Self {
        Self {
            provider,
            max_attempts: config.max_attempts.max(1),
            base_delay: config.retry_base_delay,
            timeout: config.timeout,
            estimate_divisor: config.estimate_divisor,
            temperature: None,
        }
    }

    /// Sets the sampling temperature for subsequent invocations.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Invokes the model with a bare user prompt.
    ///
    /// # Errors
    ///
    /// - [`AgentError::QuotaExceeded`] when throttling persisted through
    ///   all attempts.
    /// - [`AgentError::ApiRequest`] for any non-throttling provider
    ///   failure (not retried).
    pub async fn invoke(
        &self,
        prompt: &str,
        model: &str,
        max_tokens: u32,
    ) -> Result<(String, TokenUsage), AgentError> {
        self.invoke_with_system(None, prompt, model, max_tokens).await
    }

    /// Invokes the model with an optional system instruction.
    ///
    /// # Errors
    ///
    /// Same contract as [`ModelCaller::invoke`].
    pub async fn invoke_with_system(
        &self,
        system: Option<&str>,
        prompt: &str,
        model: &str,
        max_tokens: u32,
    ) -> Result<(String, TokenUsage), AgentError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(system_message(system));
        }
        messages.push(user_message(prompt));

        let request = ChatRequest {
            model: model.to_string(),
            messages,
            temperature: self.temperature,
            max_tokens: Some(max_tokens),
        };

        let mut state = RetryState::Attempting { attempt: 1 };

        loop {
            match state {
                RetryState::Attempting { attempt } => {
                    match self.attempt(&request).await {
                        Ok(response) => {
                            let usage = self.normalize_usage(prompt, &response.0, response.1);
                            debug!(
                                model,
                                attempt,
                                total_tokens = usage.total_tokens,
                                estimated = usage.is_estimated,
                                "model call succeeded"
                            );
                            return Ok((response.0, usage));
                        }
                        Err(AgentError::Throttled { message }) => {
                            if attempt >= self.max_attempts {
                                return Err(AgentError::QuotaExceeded {
                                    attempts: self.max_attempts,
                                    message,
                                });
                            }
                            warn!(model, attempt, %message, "provider throttled, backing off");
                            state = RetryState::Backoff { attempt };
                        }
                        // Auth, malformed request, network, timeout: fatal.
                        Err(other) => return Err(other),
                    }
                }
                RetryState::Backoff { attempt } => {
                    tokio::time::sleep(self.backoff_delay(attempt)).await;
                    state = RetryState::Attempting { attempt: attempt + 1 };
                }
            }
        }
    }

    /// Issues one provider call under the configured timeout.
    async fn attempt(
        &self,
        request: &ChatRequest,
    ) -> Result<(String, Option<TokenUsage>), AgentError> {
        let response = tokio::time::timeout(self.timeout, self.provider.chat(request))
            .await
            .map_err(|_| AgentError::ApiRequest {
                message: format!("request timed out after {}s", self.timeout.as_secs()),
                status: None,
            })??;

        Ok((response.content, response.usage))
    }

    /// Backoff before the attempt following throttled attempt `attempt`:
    /// base, 2×base, 4×base, …
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2_u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }

    /// Passes provider-reported usage through, or estimates from character
    /// lengths when the provider reported nothing useful.
    fn normalize_usage(
        &self,
        prompt: &str,
        content: &str,
        reported: Option<TokenUsage>,
    ) -> TokenUsage {
        match reported {
            Some(usage) if usage.total_tokens > 0 => usage,
            _ => TokenUsage::estimate(prompt.len(), content.len(), self.estimate_divisor),
        }
    }
}

impl std::fmt::Debug for ModelCaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelCaller")
            .field("provider", &self.provider.name())
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .finish_non_exhaustive()
    }
}
