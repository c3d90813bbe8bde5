//! Agent configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AgentError;

/// Default model for research requests.
const DEFAULT_MODEL: &str = "gpt-5-mini-2025-08-07";
/// Default token budget for a standard research request.
const DEFAULT_MAX_TOKENS: u32 = 512;
/// Smallest accepted per-request token budget.
const DEFAULT_MIN_REQUEST_TOKENS: u32 = 16;
/// Largest accepted per-request token budget.
const DEFAULT_MAX_REQUEST_TOKENS: u32 = 8192;
/// Floor for each deep-research step's share of the request budget.
const DEFAULT_STEP_MIN_TOKENS: u32 = 256;
/// Default sliding-window length for the local rate limiter.
const DEFAULT_RATE_WINDOW_SECS: u64 = 60;
/// Default admitted calls per rate window.
const DEFAULT_RATE_MAX_REQUESTS: usize = 10;
/// Default maximum provider call attempts (first try + retries).
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default base backoff delay, doubled on each retry.
const DEFAULT_RETRY_BASE_DELAY_SECS: u64 = 1;
/// Default per-call request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// Default character-per-token divisor for usage estimation.
const DEFAULT_ESTIMATE_DIVISOR: usize = 3;

/// Configuration for the research agent system.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// LLM provider name (e.g., "openai").
    pub provider: String,
    /// API key for the provider.
    pub api_key: String,
    /// Optional base URL override (for proxies or compatible APIs).
    pub base_url: Option<String>,
    /// Default model when the request does not name one.
    pub model: String,
    /// Default token budget when the request does not carry one.
    pub max_tokens: u32,
    /// Smallest accepted per-request token budget.
    pub min_request_tokens: u32,
    /// Largest accepted per-request token budget.
    pub max_request_tokens: u32,
    /// Floor for each deep-research step's share of the request budget.
    pub step_min_tokens: u32,
    /// Sliding-window length for the local rate limiter.
    pub rate_window: Duration,
    /// Admitted calls per rate window.
    pub rate_max_requests: usize,
    /// Maximum provider call attempts (first try + retries on throttling).
    pub max_attempts: u32,
    /// Base backoff delay; doubles on each subsequent retry.
    pub retry_base_delay: Duration,
    /// Per-call request timeout.
    pub timeout: Duration,
    /// Character-per-token divisor for usage estimation when the provider
    /// reports nothing. A stated approximation, not a hard contract.
    pub estimate_divisor: usize,
    /// Whether deep research includes the devil's-advocate critique step
    /// (seventh section, placed before synthesis).
    pub devils_advocate: bool,
    /// Directory containing prompt template files.
    ///
    /// When set, system prompts are loaded from markdown files in this
    /// directory, falling back to compiled-in defaults for missing files.
    pub prompt_dir: Option<PathBuf>,
}

impl AgentConfig {
    /// Creates a new builder for `AgentConfig`.
    #[must_use]
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key is found.
    pub fn from_env() -> Result<Self, AgentError> {
        Self::builder().from_env().build()
    }
}

/// Builder for [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    provider: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    max_tokens: Option<u32>,
    min_request_tokens: Option<u32>,
    max_request_tokens: Option<u32>,
    step_min_tokens: Option<u32>,
    rate_window: Option<Duration>,
    rate_max_requests: Option<usize>,
    max_attempts: Option<u32>,
    retry_base_delay: Option<Duration>,
    timeout: Option<Duration>,
    estimate_divisor: Option<usize>,
    devils_advocate: Option<bool>,
    prompt_dir: Option<PathBuf>,
}

impl AgentConfigBuilder {
    /// Populates unset fields from environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.provider.is_none() {
            self.provider = std::env::var("RESEARCH_PROVIDER").ok();
        }
        if self.api_key.is_none() {
            self.api_key = std::env::var("RESEARCH_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok();
        }
        if self.base_url.is_none() {
            self.base_url = std::env::var("RESEARCH_BASE_URL")
                .or_else(|_| std::env::var("OPENAI_BASE_URL"))
                .ok();
        }
        if self.model.is_none() {
            self.model = std::env::var("RESEARCH_MODEL").ok();
        }
        if self.rate_max_requests.is_none() {
            self.rate_max_requests = std::env::var("RESEARCH_RATE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        if self.devils_advocate.is_none() {
            self.devils_advocate = std::env::var("RESEARCH_DEVILS_ADVOCATE")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        if self.prompt_dir.is_none() {
            self.prompt_dir = std::env::var("RESEARCH_PROMPT_DIR").ok().map(PathBuf::from);
        }
        self
    }

    /// Sets the LLM provider name.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base URL override.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the default model.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the default token budget.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the accepted per-request token budget range.
    #[must_use]
    pub const fn request_token_range(mut self, min: u32, max: u32) -> Self {
        self.min_request_tokens = Some(min);
        self.max_request_tokens = Some(max);
        self
    }

    /// Sets the floor for each deep-research step's token share.
    #[must_use]
    pub const fn step_min_tokens(mut self, n: u32) -> Self {
        self.step_min_tokens = Some(n);
        self
    }

    /// Sets the rate limiter sliding window.
    #[must_use]
    pub const fn rate_window(mut self, window: Duration) -> Self {
        self.rate_window = Some(window);
        self
    }

    /// Sets the admitted calls per rate window.
    #[must_use]
    pub const fn rate_max_requests(mut self, n: usize) -> Self {
        self.rate_max_requests = Some(n);
        self
    }

    /// Sets the maximum provider call attempts.
    #[must_use]
    pub const fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = Some(n);
        self
    }

    /// Sets the base backoff delay.
    #[must_use]
    pub const fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = Some(delay);
        self
    }

    /// Sets the per-call request timeout.
    #[must_use]
    pub const fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the character-per-token estimation divisor.
    #[must_use]
    pub const fn estimate_divisor(mut self, divisor: usize) -> Self {
        self.estimate_divisor = Some(divisor);
        self
    }

    /// Enables or disables the devil's-advocate critique step.
    #[must_use]
    pub const fn devils_advocate(mut self, enabled: bool) -> Self {
        self.devils_advocate = Some(enabled);
        self
    }

    /// Sets the prompt template directory.
    #[must_use]
    pub fn prompt_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompt_dir = Some(dir.into());
        self
    }

    /// Builds the [`AgentConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ApiKeyMissing`] if no API key was set.
    pub fn build(self) -> Result<AgentConfig, AgentError> {
        let api_key = self.api_key.ok_or(AgentError::ApiKeyMissing)?;

        Ok(AgentConfig {
            provider: self.provider.unwrap_or_else(|| "openai".to_string()),
            api_key,
            base_url: self.base_url,
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            min_request_tokens: self
                .min_request_tokens
                .unwrap_or(DEFAULT_MIN_REQUEST_TOKENS),
            max_request_tokens: self
                .max_request_tokens
                .unwrap_or(DEFAULT_MAX_REQUEST_TOKENS),
            step_min_tokens: self.step_min_tokens.unwrap_or(DEFAULT_STEP_MIN_TOKENS),
            rate_window: self
                .rate_window
                .unwrap_or(Duration::from_secs(DEFAULT_RATE_WINDOW_SECS)),
            rate_max_requests: self.rate_max_requests.unwrap_or(DEFAULT_RATE_MAX_REQUESTS),
            max_attempts: self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS).max(1),
            retry_base_delay: self
                .retry_base_delay
                .unwrap_or(Duration::from_secs(DEFAULT_RETRY_BASE_DELAY_SECS)),
            timeout: self
                .timeout
                .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            estimate_divisor: self.estimate_divisor.unwrap_or(DEFAULT_ESTIMATE_DIVISOR),
            devils_advocate: self.devils_advocate.unwrap_or(false),
            prompt_dir: self.prompt_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = AgentConfig::builder()
            .api_key("test-key")
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.provider, "openai");
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.rate_max_requests, 10);
        assert_eq!(config.rate_window, Duration::from_secs(60));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.estimate_divisor, 3);
        assert!(!config.devils_advocate);
    }

    #[test]
    fn test_builder_missing_api_key() {
        let result = AgentConfig::builder().build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AgentConfig::builder()
            .api_key("key")
            .provider("custom")
            .model("gpt-5.2-2025-12-11")
            .rate_max_requests(3)
            .rate_window(Duration::from_secs(10))
            .max_attempts(5)
            .retry_base_delay(Duration::from_millis(100))
            .devils_advocate(true)
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.provider, "custom");
        assert_eq!(config.model, "gpt-5.2-2025-12-11");
        assert_eq!(config.rate_max_requests, 3);
        assert_eq!(config.rate_window, Duration::from_secs(10));
        assert_eq!(config.max_attempts, 5);
        assert!(config.devils_advocate);
    }

    #[test]
    fn test_builder_zero_attempts_clamped() {
        let config = AgentConfig::builder()
            .api_key("key")
            .max_attempts(0)
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.max_attempts, 1);
    }

    #[test]
    fn test_token_range() {
        let config = AgentConfig::builder()
            .api_key("key")
            .request_token_range(32, 2048)
            .build()
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(config.min_request_tokens, 32);
        assert_eq!(config.max_request_tokens, 2048);
    }
}
