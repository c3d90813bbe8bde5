//! System prompts and template builders for the research pipeline.
//!
//! Each deep-research step has a role-defining system prompt and shares a
//! user-message builder that threads the original query plus condensed
//! summaries of all prior sections into the step's context. Prompts load
//! from external template files when available, falling back to
//! compiled-in defaults.

use std::fmt::Write;
use std::path::Path;

use super::report::{StepName, StepResult};

/// System prompt for standard (single-call) research.
pub const STANDARD_SYSTEM_PROMPT: &str = "You are a research assistant. \
Answer the question concisely and factually. Be direct: no preamble, no \
conclusion, no filler. Stay within the stated word budget.";

/// System prompt for the planning step.
pub const PLANNING_SYSTEM_PROMPT: &str = "You are a senior product manager creating a research plan.

Break the question down into a structured research plan covering:
1. Market & Opportunity
2. User Needs & Pain Points
3. Competitive Landscape
4. Risks & Challenges
5. Strategic Recommendations

Provide a concise plan (2-3 sentences per area). Be thorough and specific.";

/// System prompt for the market analysis step.
pub const MARKET_SYSTEM_PROMPT: &str = "You are a market analyst for product management.

Provide a comprehensive market and opportunity analysis with specific details:
- Market size estimate with numbers (TAM/SAM/SOM if applicable)
- Growth rate and trajectory (percentages, trends)
- Current market trends and dynamics
- Target customer segments and their characteristics
- Market maturity stage, entry barriers and opportunities

Be detailed, specific, and data-driven. Provide 6-8 substantive points.";

/// System prompt for the user insights step.
pub const USERS_SYSTEM_PROMPT: &str = "You are a user research expert conducting deep analysis.

Provide a comprehensive user needs and pain-points analysis:
- Define 2-3 primary user personas with demographics and behaviors
- Identify specific pain points with severity levels
- Articulate user expectations, desires, and motivations
- Identify adoption barriers (cost, complexity, switching costs)
- Analyze willingness to pay and value perception

Be specific and thorough. Provide 6-8 detailed insights.";

/// System prompt for the competitive landscape step.
pub const COMPETITION_SYSTEM_PROMPT: &str = "You are a competitive intelligence analyst.

Provide a comprehensive competitive landscape analysis:
- Identify specific competitors by name (direct and indirect)
- Analyze each competitor's positioning, strengths, and weaknesses
- Evaluate competitive advantages and moats
- Identify gaps in current market solutions
- Analyze pricing strategies and business models

Be specific with company names and detailed analysis. Provide 6-8 strategic insights.";

/// System prompt for the risk assessment step.
pub const RISKS_SYSTEM_PROMPT: &str = "You are a risk assessment specialist.

Provide a comprehensive risks and challenges assessment:
- Technical risks (scalability, architecture, integration, security)
- Market risks (timing, adoption, competition, saturation)
- Financial risks (burn rate, unit economics, profitability)
- Operational, regulatory, and compliance risks
- Mitigation strategies for each major risk

Be realistic and specific. Identify 6-8 significant risks with mitigations.";

/// System prompt for the devil's-advocate critique step.
pub const DEVILS_ADVOCATE_SYSTEM_PROMPT: &str = "You are a devil's advocate: a critical analyst \
whose job is to challenge assumptions and explain why this product might fail.

Be brutally honest. Identify:
- Over-optimistic assumptions in the research so far
- Hidden costs and challenges not yet considered
- Why competitors might crush this product
- Why users might not adopt it despite claimed pain points
- Timing issues (too early or too late to market)
- Financial reasons this won't be profitable

Be pessimistic, realistic, and blunt. Provide 8-10 critical points.";

/// System prompt for the strategic synthesis step.
pub const SYNTHESIS_SYSTEM_PROMPT: &str = "You are a Chief Product Officer synthesizing research \
into a balanced decision framework.

Provide comprehensive strategic recommendations that balance optimism with realism:
1. Clear decision (Go/No-Go/Pivot, with detailed rationale)
2. Key success metrics (specific, measurable KPIs)
3. Recommended approach (phased rollout, MVP strategy, or full launch)
4. Timeline and milestones with key decision points
5. Resource requirements (team, budget, time estimates)
6. Go/No-Go criteria (what would make you stop or pivot)

Be realistic, balanced, and actionable. This should be a complete decision framework.";

/// Default prompt directory under user config.
const DEFAULT_PROMPT_DIR: &str = ".config/research-rs/prompts";

/// Filename for the standard research template.
const STANDARD_FILENAME: &str = "standard.md";

/// Longest slice of each prior section threaded into a step's context.
/// Keeps the accumulated context from blowing the prompt budget on
/// later steps.
const MAX_CONTEXT_CHARS_PER_SECTION: usize = 1500;

/// A set of system prompts for the whole pipeline.
///
/// Loaded from external template files when available, falling back to
/// compiled-in defaults. Use [`PromptSet::load`] to resolve the prompt
/// directory from config, environment, or the default path.
#[derive(Debug, Clone)]
pub struct PromptSet {
    /// System prompt for standard research.
    pub standard: String,
    /// System prompts for the deep-research steps, keyed by [`StepName`].
    planning: String,
    market: String,
    users: String,
    competition: String,
    risks: String,
    devils_advocate: String,
    synthesis: String,
}

impl PromptSet {
    /// Loads prompts from the given directory, falling back to compiled-in defaults.
    ///
    /// Resolution order for the directory:
    /// 1. Explicit `prompt_dir` argument (from config or `--prompt-dir`)
    /// 2. `RESEARCH_PROMPT_DIR` environment variable
    /// 3. `~/.config/research-rs/prompts/`
    ///
    /// Each file is loaded independently — a missing file uses its default.
    #[must_use]
    pub fn load(prompt_dir: Option<&Path>) -> Self {
        let resolved_dir = prompt_dir
            .map(std::path::PathBuf::from)
            .or_else(|| {
                std::env::var("RESEARCH_PROMPT_DIR")
                    .ok()
                    .map(std::path::PathBuf::from)
            })
            .or_else(|| dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR)));

        let load_file = |filename: &str, default: &str| -> String {
            resolved_dir
                .as_ref()
                .map(|dir| dir.join(filename))
                .and_then(|path| std::fs::read_to_string(&path).ok())
                .unwrap_or_else(|| default.to_string())
        };

        let mut set = Self::defaults();
        set.standard = load_file(STANDARD_FILENAME, STANDARD_SYSTEM_PROMPT);
        for (step, default) in Self::step_defaults() {
            *set.step_slot(step) = load_file(&format!("{step}.md"), default);
        }
        set
    }

    /// Returns compiled-in defaults without checking the filesystem.
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            standard: STANDARD_SYSTEM_PROMPT.to_string(),
            planning: PLANNING_SYSTEM_PROMPT.to_string(),
            market: MARKET_SYSTEM_PROMPT.to_string(),
            users: USERS_SYSTEM_PROMPT.to_string(),
            competition: COMPETITION_SYSTEM_PROMPT.to_string(),
            risks: RISKS_SYSTEM_PROMPT.to_string(),
            devils_advocate: DEVILS_ADVOCATE_SYSTEM_PROMPT.to_string(),
            synthesis: SYNTHESIS_SYSTEM_PROMPT.to_string(),
        }
    }

    /// System prompt for a deep-research step.
    #[must_use]
    pub fn for_step(&self, step: StepName) -> &str {
        match step {
            StepName::Planning => &self.planning,
            StepName::Market => &self.market,
            StepName::Users => &self.users,
            StepName::Competition => &self.competition,
            StepName::Risks => &self.risks,
            StepName::DevilsAdvocate => &self.devils_advocate,
            StepName::Synthesis => &self.synthesis,
        }
    }

    /// Writes the compiled-in default prompts to the given directory.
    ///
    /// Creates the directory if it does not exist. Existing files are
    /// **not** overwritten — use this for initial scaffolding only.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if directory creation or file writing fails.
    pub fn write_defaults(dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let mut templates = vec![(STANDARD_FILENAME.to_string(), STANDARD_SYSTEM_PROMPT)];
        for (step, default) in Self::step_defaults() {
            templates.push((format!("{step}.md"), default));
        }

        let mut written = Vec::new();
        for (filename, content) in &templates {
            let path = dir.join(filename);
            if !path.exists() {
                std::fs::write(&path, content)?;
                written.push(path);
            }
        }

        Ok(written)
    }

    /// Returns the default prompt directory under the user's home.
    ///
    /// Returns `None` if the home directory cannot be determined.
    #[must_use]
    pub fn default_dir() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|h| h.join(DEFAULT_PROMPT_DIR))
    }

    fn step_defaults() -> [(StepName, &'static str); 7] {
        [
            (StepName::Planning, PLANNING_SYSTEM_PROMPT),
            (StepName::Market, MARKET_SYSTEM_PROMPT),
            (StepName::Users, USERS_SYSTEM_PROMPT),
            (StepName::Competition, COMPETITION_SYSTEM_PROMPT),
            (StepName::Risks, RISKS_SYSTEM_PROMPT),
            (StepName::DevilsAdvocate, DEVILS_ADVOCATE_SYSTEM_PROMPT),
            (StepName::Synthesis, SYNTHESIS_SYSTEM_PROMPT),
        ]
    }

    fn step_slot(&mut self, step: StepName) -> &mut String {
        match step {
            StepName::Planning => &mut self.planning,
            StepName::Market => &mut self.market,
            StepName::Users => &mut self.users,
            StepName::Competition => &mut self.competition,
            StepName::Risks => &mut self.risks,
            StepName::DevilsAdvocate => &mut self.devils_advocate,
            StepName::Synthesis => &mut self.synthesis,
        }
    }
}

/// Builds the user message for standard research.
///
/// The word budget mirrors the token budget so small budgets produce
/// proportionally terse answers.
#[must_use]
pub fn build_standard_prompt(query: &str, max_tokens: u32) -> String {
    format!(
        "Answer this concisely in {} words or less. Be direct and factual. \
         No preamble or conclusion.\n\nQuestion: {query}",
        (max_tokens / 2).max(10)
    )
}

/// Builds the user message for a deep-research step.
///
/// Threads the original query plus a condensed summary of every prior
/// section, each truncated to a fixed length, so later steps see the
/// accumulated research without unbounded prompt growth.
#[must_use]
pub fn build_step_prompt(step: StepName, query: &str, prior: &[StepResult]) -> String {
    let mut prompt = format!("<question>{query}</question>\n");

    if !prior.is_empty() {
        prompt.push_str("\n<research_so_far>\n");
        for section in prior {
            let _ = write!(
                prompt,
                "## {}\n{}\n\n",
                section.step.title(),
                condense(&section.content, MAX_CONTEXT_CHARS_PER_SECTION),
            );
        }
        prompt.push_str("</research_so_far>\n");
    }

    let _ = write!(
        prompt,
        "\nProduce the {} section for this question.",
        step.title()
    );
    prompt
}

/// Truncates text to at most `max_chars`, respecting char boundaries.
fn condense(text: &str, max_chars: usize) -> &str {
    if text.len() <= max_chars {
        return text;
    }
    let mut end = max_chars;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::message::TokenUsage;

    #[test]
    fn test_build_standard_prompt_scales_word_budget() {
        let prompt = build_standard_prompt("what is Rust?", 512);
        assert!(prompt.contains("256 words"));
        assert!(prompt.contains("what is Rust?"));
    }

    #[test]
    fn test_build_step_prompt_no_prior_context() {
        let prompt = build_step_prompt(StepName::Planning, "should we build X?", &[]);
        assert!(prompt.contains("<question>should we build X?</question>"));
        assert!(!prompt.contains("<research_so_far>"));
        assert!(prompt.contains("Research Plan"));
    }

    #[test]
    fn test_build_step_prompt_threads_prior_sections() {
        let prior = vec![
            StepResult {
                step: StepName::Planning,
                content: "the plan".to_string(),
                usage: TokenUsage::default(),
            },
            StepResult {
                step: StepName::Market,
                content: "the market".to_string(),
                usage: TokenUsage::default(),
            },
        ];
        let prompt = build_step_prompt(StepName::Users, "q", &prior);
        assert!(prompt.contains("## Research Plan\nthe plan"));
        assert!(prompt.contains("## Market Analysis\nthe market"));
        assert!(prompt.contains("User Insights"));
    }

    #[test]
    fn test_build_step_prompt_condenses_long_sections() {
        let prior = vec![StepResult {
            step: StepName::Planning,
            content: "x".repeat(10_000),
            usage: TokenUsage::default(),
        }];
        let prompt = build_step_prompt(StepName::Market, "q", &prior);
        assert!(prompt.len() < 10_000);
    }

    #[test]
    fn test_condense_respects_char_boundaries() {
        let text = "héllo wörld".repeat(300);
        let out = condense(&text, 100);
        assert!(out.len() <= 100);
        assert!(text.starts_with(out));
    }

    #[test]
    fn test_prompt_set_covers_every_step() {
        let set = PromptSet::defaults();
        for (step, _) in PromptSet::step_defaults() {
            assert!(!set.for_step(step).is_empty());
        }
        assert!(!set.standard.is_empty());
    }

    #[test]
    fn test_write_defaults_and_reload() {
        let dir = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
        let written =
            PromptSet::write_defaults(dir.path()).unwrap_or_else(|_| unreachable!());
        assert_eq!(written.len(), 8);

        // Existing files are not overwritten on a second pass.
        let rewritten =
            PromptSet::write_defaults(dir.path()).unwrap_or_else(|_| unreachable!());
        assert!(rewritten.is_empty());

        let set = PromptSet::load(Some(dir.path()));
        assert_eq!(set.for_step(StepName::Planning), PLANNING_SYSTEM_PROMPT);
    }

    #[test]
    fn test_load_overrides_single_file() {
        let dir = tempfile::tempdir().unwrap_or_else(|_| unreachable!());
        std::fs::write(dir.path().join("risks.md"), "custom risk prompt")
            .unwrap_or_else(|_| unreachable!());
        let set = PromptSet::load(Some(dir.path()));
        assert_eq!(set.for_step(StepName::Risks), "custom risk prompt");
        assert_eq!(set.for_step(StepName::Market), MARKET_SYSTEM_PROMPT);
    }
}
