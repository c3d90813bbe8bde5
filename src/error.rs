//! Error types for the research orchestration crate.
//!
//! Uses `thiserror` for structured error variants. The taxonomy separates
//! locally-recoverable conditions (rate-limit rejections, exhausted quota)
//! from fatal ones (validation failures, non-throttling provider errors)
//! so the CLI boundary can translate each class into an actionable message.

/// Errors produced by the agent system.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// No API key was found in configuration or environment.
    #[error("API key missing: set RESEARCH_API_KEY or OPENAI_API_KEY")]
    ApiKeyMissing,

    /// The configured provider name is not recognized.
    #[error("unsupported provider: {name}")]
    UnsupportedProvider {
        /// The unrecognized provider name.
        name: String,
    },

    /// The request was malformed (empty query, out-of-range token budget).
    ///
    /// Never retried.
    #[error("invalid request: {message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// The local sliding-window rate limiter rejected the call.
    ///
    /// Always recoverable: the caller should wait `wait_secs` and retry.
    #[error(
        "rate limit exceeded: wait {wait_secs}s before retrying \
         (limit: {limit} requests per {window_secs}s)"
    )]
    RateLimited {
        /// Seconds until the oldest tracked call leaves the window.
        wait_secs: u64,
        /// Maximum admitted calls per window.
        limit: usize,
        /// Window length in seconds.
        window_secs: u64,
    },

    /// The provider signaled throttling (HTTP 429 / quota pressure).
    ///
    /// Transient: the model caller retries these with exponential backoff.
    /// Callers outside the retry loop should never observe this variant;
    /// exhausted retries surface as [`AgentError::QuotaExceeded`].
    #[error("provider throttled the request: {message}")]
    Throttled {
        /// Provider-reported throttling detail.
        message: String,
    },

    /// Provider throttling persisted through every retry attempt.
    ///
    /// Recoverable after a longer wait. The message carries remediation
    /// guidance rather than a raw provider trace.
    #[error(
        "provider quota exceeded after {attempts} attempts: {message}. \
         Wait a minute or two before retrying, lower the token limit to \
         conserve quota, or check your provider usage dashboard"
    )]
    QuotaExceeded {
        /// Number of attempts made before giving up.
        attempts: u32,
        /// Last throttling detail reported by the provider.
        message: String,
    },

    /// Any other upstream provider failure (auth, malformed request,
    /// network). Not retried; surfaced with the underlying cause.
    #[error("provider request failed: {message}")]
    ApiRequest {
        /// Underlying cause from the provider or transport.
        message: String,
        /// HTTP status code, when the transport exposed one.
        status: Option<u16>,
    },

    /// Workflow-level failure not attributable to a single provider call.
    #[error("orchestration failed: {message}")]
    Orchestration {
        /// Description of the failure.
        message: String,
    },
}

impl AgentError {
    /// Whether the caller can recover by waiting and retrying.
    ///
    /// Rate-limit rejections and exhausted quota clear on their own;
    /// everything else is fatal for the current request.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::QuotaExceeded { .. } | Self::Throttled { .. }
        )
    }
}
