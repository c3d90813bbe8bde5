//! Output formatting for CLI results.
//!
//! Renders research reports and model listings as human-readable text or
//! JSON. The JSON shapes are a stable contract for scripting: standard
//! research carries `{query, result, model, token_usage}`, deep research
//! adds `mode`, `steps_completed`, and an `estimated_tokens` heuristic.

use std::fmt::Write;

use serde::Serialize;

use crate::agent::message::TokenUsage;
use crate::agent::models::ModelInfo;
use crate::agent::report::ResearchReport;

/// Character-per-token divisor for the `estimated_tokens` response field.
const ESTIMATED_TOKENS_DIVISOR: usize = 3;

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text (default).
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Parses a format string. Unknown values fall back to text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// JSON shape for a standard research response.
#[derive(Debug, Serialize)]
pub struct StandardResponse<'a> {
    /// The original query.
    pub query: &'a str,
    /// The answer text.
    pub result: String,
    /// Model that produced the answer.
    pub model: &'a str,
    /// Token usage for the single call.
    pub token_usage: TokenUsage,
}

/// JSON shape for a deep research response.
#[derive(Debug, Serialize)]
pub struct DeepResponse<'a> {
    /// The original query.
    pub query: &'a str,
    /// The assembled structured report.
    pub result: String,
    /// Model that produced the report.
    pub model: &'a str,
    /// Always `"deep_research"`.
    pub mode: &'static str,
    /// Number of pipeline steps executed.
    pub steps_completed: usize,
    /// Heuristic token estimate: result length divided by 3.
    pub estimated_tokens: usize,
    /// Aggregate usage across all steps.
    pub token_usage: TokenUsage,
}

/// Formats a standard research report.
///
/// # Errors
///
/// Returns a serialization error message for JSON output failures.
pub fn format_standard(
    report: &ResearchReport,
    model: &str,
    format: OutputFormat,
) -> Result<String, String> {
    match format {
        OutputFormat::Text => {
            let mut out = report.render();
            let _ = write!(out, "\n\n---\n{}", usage_line(&report.aggregate_usage));
            Ok(out)
        }
        OutputFormat::Json => {
            let response = StandardResponse {
                query: &report.query,
                result: report.render(),
                model,
                token_usage: report.aggregate_usage,
            };
            serde_json::to_string_pretty(&response).map_err(|e| e.to_string())
        }
    }
}

/// Formats a deep research report.
///
/// # Errors
///
/// Returns a serialization error message for JSON output failures.
pub fn format_deep(
    report: &ResearchReport,
    model: &str,
    format: OutputFormat,
) -> Result<String, String> {
    let result = report.render();
    match format {
        OutputFormat::Text => Ok(format!(
            "{result}\n\n---\nSteps: {} | {}",
            report.steps_completed(),
            usage_line(&report.aggregate_usage),
        )),
        OutputFormat::Json => {
            let response = DeepResponse {
                query: &report.query,
                estimated_tokens: result.len() / ESTIMATED_TOKENS_DIVISOR,
                result,
                model,
                mode: "deep_research",
                steps_completed: report.steps_completed(),
                token_usage: report.aggregate_usage,
            };
            serde_json::to_string_pretty(&response).map_err(|e| e.to_string())
        }
    }
}

/// Formats the model listing, one line per model, cheapest first.
///
/// # Errors
///
/// Returns a serialization error message for JSON output failures.
pub fn format_models(models: &[ModelInfo], format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Text => {
            let mut out = String::from("Available models (cheapest first):\n");
            for model in models {
                let _ = write!(
                    out,
                    "\n  {:<36} {:<24} {}",
                    model.name, model.display_name, model.price_indicator
                );
            }
            Ok(out)
        }
        OutputFormat::Json => serde_json::to_string_pretty(models).map_err(|e| e.to_string()),
    }
}

/// One-line token usage summary for text output.
fn usage_line(usage: &TokenUsage) -> String {
    format!(
        "Tokens: {}{} (prompt: {}, completion: {})",
        usage.total_tokens,
        if usage.is_estimated { " est." } else { "" },
        usage.prompt_tokens,
        usage.completion_tokens,
    )
}
