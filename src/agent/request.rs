//! Validated research request.

use crate::agent::config::AgentConfig;
use crate::error::AgentError;

/// A validated research request.
///
/// Immutable once constructed; created per incoming call and discarded
/// when the call completes. Construction enforces the validation rules,
/// so every downstream component can trust the fields.
#[derive(Debug, Clone)]
pub struct ResearchRequest {
    /// The research question or topic. Non-empty after trimming.
    pub query: String,
    /// Model identifier to run against.
    pub model: String,
    /// Token budget, within the configured range.
    pub max_tokens: u32,
}

impl ResearchRequest {
    /// Validates and builds a request.
    ///
    /// Empty model or token budget of zero fall back to config defaults
    /// before validation.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Validation`] for an empty query or a token
    /// budget outside `[config.min_request_tokens, config.max_request_tokens]`.
    pub fn new(
        query: &str,
        model: Option<&str>,
        max_tokens: Option<u32>,
        config: &AgentConfig,
    ) -> Result<Self, AgentError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AgentError::Validation {
                message: "query must not be empty".to_string(),
            });
        }

        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&config.model)
            .to_string();

        let max_tokens = max_tokens.unwrap_or(config.max_tokens);
        if max_tokens < config.min_request_tokens || max_tokens > config.max_request_tokens {
            return Err(AgentError::Validation {
                message: format!(
                    "max_tokens {max_tokens} outside accepted range {}..={}",
                    config.min_request_tokens, config.max_request_tokens
                ),
            });
        }

        Ok(Self {
            query: query.to_string(),
            model,
            max_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AgentConfig {
        AgentConfig::builder()
            .api_key("test")
            .build()
            .unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn test_valid_request() {
        let req = ResearchRequest::new("is this viable?", Some("gpt-4o"), Some(512), &config());
        let req = req.unwrap_or_else(|_| unreachable!());
        assert_eq!(req.query, "is this viable?");
        assert_eq!(req.model, "gpt-4o");
        assert_eq!(req.max_tokens, 512);
    }

    #[test]
    fn test_empty_query_rejected() {
        let result = ResearchRequest::new("   ", None, None, &config());
        assert!(matches!(result, Err(AgentError::Validation { .. })));
    }

    #[test]
    fn test_defaults_applied() {
        let cfg = config();
        let req = ResearchRequest::new("q", None, None, &cfg)
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(req.model, cfg.model);
        assert_eq!(req.max_tokens, cfg.max_tokens);
    }

    #[test]
    fn test_token_budget_out_of_range() {
        let cfg = config();
        assert!(ResearchRequest::new("q", None, Some(1), &cfg).is_err());
        assert!(ResearchRequest::new("q", None, Some(1_000_000), &cfg).is_err());
        assert!(ResearchRequest::new("q", None, Some(cfg.max_request_tokens), &cfg).is_ok());
    }
}
