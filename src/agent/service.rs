//! Research service: the boundary object callers talk to.
//!
//! Owns the injected provider and the process-wide rate limiter, and
//! dispatches validated requests to either the single-call standard path
//! or the deep-research pipeline. Every request passes the rate-limit
//! gate before any provider call; concurrent requests serialize only for
//! the admit check, never for the calls themselves.

use std::sync::Arc;

use tracing::debug;

use super::caller::ModelCaller;
use super::client::create_provider;
use super::config::AgentConfig;
use super::limiter::RateLimiter;
use super::models::{self, ModelInfo};
use super::prompt::{PromptSet, build_standard_prompt};
use super::provider::LlmProvider;
use super::report::{ResearchReport, StepName, StepResult};
use super::request::ResearchRequest;
use super::workflow::DeepResearchWorkflow;
use crate::error::AgentError;

/// Sampling temperature for standard research: low for focused answers.
const STANDARD_TEMPERATURE: f32 = 0.3;

/// Entry point for research requests.
///
/// The provider and limiter are explicit constructor arguments rather
/// than module-level singletons, so tests can substitute a stub provider
/// and a limiter with a short window.
pub struct ResearchService {
    provider: Arc<dyn LlmProvider>,
    limiter: Arc<RateLimiter>,
    config: AgentConfig,
    prompts: PromptSet,
}

impl ResearchService {
    /// Creates a service with an injected provider and limiter.
    ///
    /// Loads prompt templates from the directory in
    /// [`AgentConfig::prompt_dir`], falling back to compiled-in defaults.
    #[must_use]
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        limiter: Arc<RateLimiter>,
        config: AgentConfig,
    ) -> Self {
        let prompts = PromptSet::load(config.prompt_dir.as_deref());
        Self {
            provider,
            limiter,
            config,
            prompts,
        }
    }

    /// Creates a service from configuration alone, constructing the
    /// provider from the registry and a limiter from the configured
    /// window.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::UnsupportedProvider`] for unknown provider
    /// names.
    pub fn from_config(config: AgentConfig) -> Result<Self, AgentError> {
        let provider = create_provider(&config)?;
        let limiter = Arc::new(RateLimiter::new(
            config.rate_window,
            config.rate_max_requests,
        ));
        Ok(Self::new(provider, limiter, config))
    }

    /// The configuration this service was built with.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Runs standard research: exactly one model invocation, wrapped into
    /// a one-section report.
    ///
    /// # Errors
    ///
    /// [`AgentError::RateLimited`] when the local window is full;
    /// otherwise the model caller's contract applies.
    pub async fn standard(&self, request: &ResearchRequest) -> Result<ResearchReport, AgentError> {
        self.limiter.admit()?;
        debug!(model = %request.model, max_tokens = request.max_tokens, "standard research");

        let caller =
            ModelCaller::new(Arc::clone(&self.provider), &self.config)
                .with_temperature(STANDARD_TEMPERATURE);
        let prompt = build_standard_prompt(&request.query, request.max_tokens);
        let (content, usage) = caller
            .invoke_with_system(
                Some(&self.prompts.standard),
                &prompt,
                &request.model,
                request.max_tokens,
            )
            .await?;

        Ok(ResearchReport::new(
            request.query.clone(),
            vec![StepResult {
                step: StepName::Synthesis,
                content,
                usage,
            }],
        ))
    }

    /// Runs the deep-research pipeline.
    ///
    /// # Errors
    ///
    /// [`AgentError::RateLimited`] when the local window is full; any step
    /// failure aborts the run per the workflow contract.
    pub async fn deep(&self, request: &ResearchRequest) -> Result<ResearchReport, AgentError> {
        self.limiter.admit()?;
        debug!(model = %request.model, max_tokens = request.max_tokens, "deep research");

        let workflow = DeepResearchWorkflow::new(
            Arc::clone(&self.provider),
            &self.config,
            self.prompts.clone(),
        );
        workflow.run(request).await
    }

    /// Lists available models sorted ascending by price tier, falling
    /// back to a curated list when the provider listing fails.
    pub async fn list_models(&self) -> Vec<ModelInfo> {
        match self.provider.list_models().await {
            Ok(names) if !names.is_empty() => models::decorate(names),
            Ok(_) | Err(_) => models::default_models(),
        }
    }
}

impl std::fmt::Debug for ResearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchService")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
