//! Deep-research workflow: a fixed ordered pipeline of dependent steps.
//!
//! Steps always execute sequentially in the fixed order Planning → Market →
//! Users → Competition → Risks → [Devil's-Advocate] → Synthesis. They are
//! never parallelized: each step's prompt is built from the original query
//! plus condensed summaries of all prior steps' outputs, a hard data
//! dependency.
//!
//! Any step failure aborts the whole run and discards accumulated
//! sections — a synthesis without its planning and market context is
//! unusable, so there is no partial-report fallback. Cancellation works
//! the same way: dropping the returned future between suspension points
//! stops all further steps (an in-flight provider call cannot be aborted
//! remotely, but nothing after it is issued).

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use super::caller::ModelCaller;
use super::config::AgentConfig;
use super::prompt::{PromptSet, build_step_prompt};
use super::provider::LlmProvider;
use super::report::{ResearchReport, StepName, StepResult};
use super::request::ResearchRequest;
use crate::error::AgentError;

/// Sampling temperature for deep research; higher than standard research
/// for more exploratory analysis.
const DEEP_TEMPERATURE: f32 = 0.7;

/// The six mandatory steps, in execution order.
const BASE_STEPS: [StepName; 6] = [
    StepName::Planning,
    StepName::Market,
    StepName::Users,
    StepName::Competition,
    StepName::Risks,
    StepName::Synthesis,
];

/// The seven-step variant with the devil's-advocate critique before
/// synthesis.
const EXTENDED_STEPS: [StepName; 7] = [
    StepName::Planning,
    StepName::Market,
    StepName::Users,
    StepName::Competition,
    StepName::Risks,
    StepName::DevilsAdvocate,
    StepName::Synthesis,
];

/// Executes the deep-research pipeline against a provider.
pub struct DeepResearchWorkflow {
    caller: ModelCaller,
    prompts: PromptSet,
    steps: &'static [StepName],
    step_min_tokens: u32,
}

impl DeepResearchWorkflow {
    /// Creates a workflow from the provider and configuration.
    ///
    /// The step sequence is fixed at construction: six steps, or seven
    /// when [`AgentConfig::devils_advocate`] is set.
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>, config: &AgentConfig, prompts: PromptSet) -> Self {
        let steps: &'static [StepName] = if config.devils_advocate {
            &EXTENDED_STEPS
        } else {
            &BASE_STEPS
        };
        Self {
            caller: ModelCaller::new(provider, config).with_temperature(DEEP_TEMPERATURE),
            prompts,
            steps,
            step_min_tokens: config.step_min_tokens,
        }
    }

    /// The fixed step sequence this workflow will execute.
    #[must_use]
    pub const fn steps(&self) -> &'static [StepName] {
        self.steps
    }

    /// Runs the full pipeline and assembles the report.
    ///
    /// # Errors
    ///
    /// Any step failure — throttling retries exhausted or a non-throttling
    /// provider error — aborts the run. Accumulated sections are dropped;
    /// no partial report is ever returned.
    pub async fn run(&self, request: &ResearchRequest) -> Result<ResearchReport, AgentError> {
        let start = Instant::now();
        let per_step_tokens = self.per_step_budget(request.max_tokens);
        let mut sections: Vec<StepResult> = Vec::with_capacity(self.steps.len());

        for &step in self.steps {
            debug!(%step, prior_sections = sections.len(), "running research step");

            let prompt = build_step_prompt(step, &request.query, &sections);
            let (content, usage) = self
                .caller
                .invoke_with_system(
                    Some(self.prompts.for_step(step)),
                    &prompt,
                    &request.model,
                    per_step_tokens,
                )
                .await?;

            sections.push(StepResult {
                step,
                content,
                usage,
            });
        }

        let report = ResearchReport::new(request.query.clone(), sections);
        info!(
            steps = report.steps_completed(),
            total_tokens = report.aggregate_usage.total_tokens,
            elapsed_ms = start.elapsed().as_millis(),
            "deep research complete"
        );
        Ok(report)
    }

    /// Splits the request budget evenly across steps, with a floor so a
    /// small overall budget still yields usable sections. The exact
    /// apportionment is tunable policy, not a correctness requirement.
    fn per_step_budget(&self, max_tokens: u32) -> u32 {
        let count = u32::try_from(self.steps.len()).unwrap_or(1).max(1);
        (max_tokens / count).max(self.step_min_tokens)
    }
}

impl std::fmt::Debug for DeepResearchWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepResearchWorkflow")
            .field("steps", &self.steps)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::agent::message::{ChatRequest, ChatResponse, TokenUsage};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Deterministic stub: echoes a fixed text per call, records prompts,
    /// and optionally fails on the n-th call.
    struct ScriptedProvider {
        calls: AtomicU32,
        prompts_seen: Mutex<Vec<String>>,
        fail_on_call: Option<u32>,
    }

    impl ScriptedProvider {
        fn new() -> Self {
            Self {
                calls: AtomicU32::new(0),
                prompts_seen: Mutex::new(Vec::new()),
                fail_on_call: None,
            }
        }

        fn failing_on(call: u32) -> Self {
            Self {
                fail_on_call: Some(call),
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.prompts_seen
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(
                    request
                        .messages
                        .last()
                        .map(|m| m.content.clone())
                        .unwrap_or_default(),
                );
            if self.fail_on_call == Some(call) {
                return Err(AgentError::ApiRequest {
                    message: "upstream failure".to_string(),
                    status: Some(500),
                });
            }
            Ok(ChatResponse {
                content: format!("section text {call}"),
                usage: Some(TokenUsage::exact(10, 20, 30)),
                finish_reason: Some("stop".to_string()),
            })
        }

        async fn list_models(&self) -> Result<Vec<String>, AgentError> {
            Ok(Vec::new())
        }
    }

    fn config(devils_advocate: bool) -> AgentConfig {
        AgentConfig::builder()
            .api_key("test")
            .devils_advocate(devils_advocate)
            .build()
            .unwrap_or_else(|_| unreachable!())
    }

    fn request(cfg: &AgentConfig) -> ResearchRequest {
        ResearchRequest::new("should we build X?", None, Some(4096), cfg)
            .unwrap_or_else(|_| unreachable!())
    }

    #[tokio::test]
    async fn test_six_sections_in_fixed_order() {
        let cfg = config(false);
        let workflow = DeepResearchWorkflow::new(
            Arc::new(ScriptedProvider::new()),
            &cfg,
            PromptSet::defaults(),
        );
        let report = workflow
            .run(&request(&cfg))
            .await
            .unwrap_or_else(|e| panic!("expected report, got {e}"));

        assert_eq!(report.steps_completed(), 6);
        let order: Vec<StepName> = report.sections.iter().map(|s| s.step).collect();
        assert_eq!(
            order,
            vec![
                StepName::Planning,
                StepName::Market,
                StepName::Users,
                StepName::Competition,
                StepName::Risks,
                StepName::Synthesis,
            ]
        );
    }

    #[tokio::test]
    async fn test_devils_advocate_adds_seventh_step_before_synthesis() {
        let cfg = config(true);
        let workflow = DeepResearchWorkflow::new(
            Arc::new(ScriptedProvider::new()),
            &cfg,
            PromptSet::defaults(),
        );
        let report = workflow
            .run(&request(&cfg))
            .await
            .unwrap_or_else(|e| panic!("expected report, got {e}"));

        assert_eq!(report.steps_completed(), 7);
        assert_eq!(report.sections[5].step, StepName::DevilsAdvocate);
        assert_eq!(report.sections[6].step, StepName::Synthesis);
    }

    #[tokio::test]
    async fn test_step_four_failure_aborts_whole_run() {
        let cfg = config(false);
        let provider = Arc::new(ScriptedProvider::failing_on(4));
        let workflow =
            DeepResearchWorkflow::new(Arc::clone(&provider) as _, &cfg, PromptSet::defaults());
        let result = workflow.run(&request(&cfg)).await;

        assert!(matches!(result, Err(AgentError::ApiRequest { .. })));
        // The failing step was the competitive-landscape call; nothing
        // after it was issued.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_later_steps_see_prior_content() {
        let cfg = config(false);
        let provider = Arc::new(ScriptedProvider::new());
        let workflow =
            DeepResearchWorkflow::new(Arc::clone(&provider) as _, &cfg, PromptSet::defaults());
        workflow
            .run(&request(&cfg))
            .await
            .unwrap_or_else(|e| panic!("expected report, got {e}"));

        let prompts = provider
            .prompts_seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        assert_eq!(prompts.len(), 6);
        // First step has no prior context; the synthesis step carries
        // every earlier section.
        assert!(!prompts[0].contains("<research_so_far>"));
        assert!(prompts[5].contains("section text 1"));
        assert!(prompts[5].contains("section text 5"));
    }

    #[tokio::test]
    async fn test_aggregate_usage_sums_all_steps() {
        let cfg = config(false);
        let workflow = DeepResearchWorkflow::new(
            Arc::new(ScriptedProvider::new()),
            &cfg,
            PromptSet::defaults(),
        );
        let report = workflow
            .run(&request(&cfg))
            .await
            .unwrap_or_else(|e| panic!("expected report, got {e}"));

        assert_eq!(report.aggregate_usage.prompt_tokens, 60);
        assert_eq!(report.aggregate_usage.completion_tokens, 120);
        assert_eq!(report.aggregate_usage.total_tokens, 180);
        assert!(!report.aggregate_usage.is_estimated);
    }

    #[test]
    fn test_per_step_budget_even_split_with_floor() {
        let cfg = config(false);
        let workflow = DeepResearchWorkflow::new(
            Arc::new(ScriptedProvider::new()),
            &cfg,
            PromptSet::defaults(),
        );
        assert_eq!(workflow.per_step_budget(6000), 1000);
        // Small budgets hit the per-step floor.
        assert_eq!(workflow.per_step_budget(60), cfg.step_min_tokens);
    }
}
