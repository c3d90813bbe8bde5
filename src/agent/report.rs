//! Report data model and usage aggregation.
//!
//! A [`ResearchReport`] is built incrementally during a workflow run and
//! immutable afterwards. Sections keep insertion order — execution order —
//! and are never reordered. Reports are owned solely by the call that
//! produced them; nothing here is shared across requests.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use super::message::TokenUsage;

/// Name of one research step, in the fixed pipeline enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    /// Research plan covering the remaining areas.
    Planning,
    /// Market and opportunity analysis.
    Market,
    /// User needs and pain-point analysis.
    Users,
    /// Competitive landscape analysis.
    Competition,
    /// Risk and challenge assessment.
    Risks,
    /// Critical counter-analysis (optional seventh step).
    DevilsAdvocate,
    /// Strategic synthesis and recommendations.
    Synthesis,
}

impl StepName {
    /// Human-readable section title used as a report header.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Planning => "Research Plan",
            Self::Market => "Market Analysis",
            Self::Users => "User Insights",
            Self::Competition => "Competitive Landscape",
            Self::Risks => "Risks & Challenges",
            Self::DevilsAdvocate => "Devil's Advocate",
            Self::Synthesis => "Strategic Recommendations",
        }
    }

    /// Short identifier used in logs and template filenames.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Market => "market",
            Self::Users => "users",
            Self::Competition => "competition",
            Self::Risks => "risks",
            Self::DevilsAdvocate => "devils_advocate",
            Self::Synthesis => "synthesis",
        }
    }
}

impl std::fmt::Display for StepName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one pipeline step. Ephemeral; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    /// Which step produced this section.
    pub step: StepName,
    /// Generated section text.
    pub content: String,
    /// Token usage for the step's provider call.
    pub usage: TokenUsage,
}

/// A completed research report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchReport {
    /// The original query.
    pub query: String,
    /// Sections in execution order.
    pub sections: Vec<StepResult>,
    /// Summed usage across all sections.
    pub aggregate_usage: TokenUsage,
}

impl ResearchReport {
    /// Builds a report from executed sections, computing the aggregate.
    #[must_use]
    pub fn new(query: String, sections: Vec<StepResult>) -> Self {
        let aggregate_usage = aggregate_usage(&sections);
        Self {
            query,
            sections,
            aggregate_usage,
        }
    }

    /// Number of steps that executed. Equal to the section count by
    /// construction: partial failure aborts the run before a report exists.
    #[must_use]
    pub fn steps_completed(&self) -> usize {
        self.sections.len()
    }

    /// Renders the report as a markdown document, one header per section
    /// in execution order.
    #[must_use]
    pub fn render(&self) -> String {
        if self.sections.len() == 1 {
            return self.sections[0].content.clone();
        }

        let mut out = format!(
            "# Deep Research Report\n\n## Research Question\n{}\n",
            self.query
        );
        for section in &self.sections {
            let _ = write!(out, "\n## {}\n{}\n", section.step.title(), section.content);
        }
        let _ = write!(
            out,
            "\n---\n*Total tokens used: {}{} (prompt: {}, completion: {})*\n",
            self.aggregate_usage.total_tokens,
            if self.aggregate_usage.is_estimated {
                " (estimated)"
            } else {
                ""
            },
            self.aggregate_usage.prompt_tokens,
            self.aggregate_usage.completion_tokens,
        );
        out
    }
}

/// Sums token usage across step results.
///
/// All three counts are summed with saturation. The aggregate is flagged
/// estimated when any constituent was estimated: mixing exact and
/// estimated sums is still only approximately accurate.
#[must_use]
pub fn aggregate_usage(steps: &[StepResult]) -> TokenUsage {
    steps.iter().fold(TokenUsage::default(), |acc, step| {
        TokenUsage {
            prompt_tokens: acc.prompt_tokens.saturating_add(step.usage.prompt_tokens),
            completion_tokens: acc
                .completion_tokens
                .saturating_add(step.usage.completion_tokens),
            total_tokens: acc.total_tokens.saturating_add(step.usage.total_tokens),
            is_estimated: acc.is_estimated || step.usage.is_estimated,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn step(name: StepName, usage: TokenUsage) -> StepResult {
        StepResult {
            step: name,
            content: format!("{name} content"),
            usage,
        }
    }

    #[test]
    fn test_aggregate_sums_fields_and_taints_estimate() {
        let steps = vec![
            step(StepName::Planning, TokenUsage::exact(10, 20, 30)),
            step(
                StepName::Market,
                TokenUsage {
                    prompt_tokens: 0,
                    completion_tokens: 0,
                    total_tokens: 0,
                    is_estimated: true,
                },
            ),
            step(StepName::Users, TokenUsage::exact(5, 5, 10)),
        ];
        let total = aggregate_usage(&steps);
        assert_eq!(total.prompt_tokens, 15);
        assert_eq!(total.completion_tokens, 25);
        assert_eq!(total.total_tokens, 40);
        assert!(total.is_estimated);
    }

    #[test]
    fn test_aggregate_all_exact_not_estimated() {
        let steps = vec![
            step(StepName::Planning, TokenUsage::exact(1, 2, 3)),
            step(StepName::Synthesis, TokenUsage::exact(4, 5, 9)),
        ];
        assert!(!aggregate_usage(&steps).is_estimated);
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(aggregate_usage(&[]), TokenUsage::default());
    }

    #[test]
    fn test_report_steps_completed_matches_sections() {
        let report = ResearchReport::new(
            "q".to_string(),
            vec![
                step(StepName::Planning, TokenUsage::exact(1, 1, 2)),
                step(StepName::Market, TokenUsage::exact(1, 1, 2)),
            ],
        );
        assert_eq!(report.steps_completed(), 2);
        assert_eq!(report.aggregate_usage.total_tokens, 4);
    }

    #[test]
    fn test_render_headers_in_execution_order() {
        let report = ResearchReport::new(
            "should we build X?".to_string(),
            vec![
                step(StepName::Planning, TokenUsage::exact(1, 1, 2)),
                step(StepName::Market, TokenUsage::exact(1, 1, 2)),
                step(StepName::Synthesis, TokenUsage::exact(1, 1, 2)),
            ],
        );
        let rendered = report.render();
        let plan_pos = rendered.find("## Research Plan").unwrap_or(usize::MAX);
        let market_pos = rendered.find("## Market Analysis").unwrap_or(usize::MAX);
        let synth_pos = rendered
            .find("## Strategic Recommendations")
            .unwrap_or(usize::MAX);
        assert!(plan_pos < market_pos);
        assert!(market_pos < synth_pos);
        assert!(rendered.contains("should we build X?"));
    }

    #[test]
    fn test_render_single_section_is_bare_answer() {
        let report = ResearchReport::new(
            "q".to_string(),
            vec![step(StepName::Synthesis, TokenUsage::exact(1, 1, 2))],
        );
        assert_eq!(report.render(), "synthesis content");
    }

    #[test]
    fn test_step_name_serialization() {
        let json = serde_json::to_string(&StepName::DevilsAdvocate).unwrap_or_default();
        assert_eq!(json, "\"devils_advocate\"");
    }

    proptest! {
        #[test]
        fn prop_aggregate_equals_fieldwise_sum(
            usages in proptest::collection::vec(
                (0_u32..10_000, 0_u32..10_000, any::<bool>()),
                0..20,
            )
        ) {
            let steps: Vec<StepResult> = usages
                .iter()
                .map(|&(p, c, est)| step(StepName::Market, TokenUsage {
                    prompt_tokens: p,
                    completion_tokens: c,
                    total_tokens: p + c,
                    is_estimated: est,
                }))
                .collect();
            let total = aggregate_usage(&steps);
            let expected_prompt: u32 = usages.iter().map(|u| u.0).sum();
            let expected_completion: u32 = usages.iter().map(|u| u.1).sum();
            prop_assert_eq!(total.prompt_tokens, expected_prompt);
            prop_assert_eq!(total.completion_tokens, expected_completion);
            prop_assert_eq!(total.total_tokens, expected_prompt + expected_completion);
            prop_assert_eq!(total.is_estimated, usages.iter().any(|u| u.2));
        }
    }
}
