//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// research-rs: rate-limited LLM research from the command line.
///
/// Runs a single-call standard research query or a sequential
/// deep-research pipeline against an OpenAI-compatible API, with a local
/// sliding-window rate limit and throttle-aware retry.
#[derive(Parser, Debug)]
#[command(name = "research-rs")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// Directory containing prompt template files.
    #[arg(long, env = "RESEARCH_PROMPT_DIR", global = true)]
    pub prompt_dir: Option<PathBuf>,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run standard research: one focused answer from a single model call.
    #[command(after_help = r#"Examples:
  research-rs research "Is there a market for a CLI-first note-taking app?"
  research-rs research "Validate this SaaS idea" --model gpt-5.2-2025-12-11
  research-rs research "Quick gut check" --max-tokens 256
  research-rs --format json research "idea" | jq .token_usage
"#)]
    Research {
        /// The research question or product idea.
        query: String,

        /// Model to use (defaults to RESEARCH_MODEL or the built-in default).
        #[arg(short, long)]
        model: Option<String>,

        /// Token budget for the response.
        #[arg(long)]
        max_tokens: Option<u32>,
    },

    /// Run deep research: a sequential multi-step analysis pipeline.
    ///
    /// Executes plan, market, users, competition, risks, and synthesis
    /// steps in order, threading each step's output into the next. Any
    /// step failure aborts the whole run.
    #[command(after_help = r#"Examples:
  research-rs deep "Should we build a self-hosted feature-flag service?"
  research-rs deep "B2B idea" --max-tokens 4096
  research-rs deep "contested idea" --devils-advocate
  research-rs --format json deep "idea" | jq .steps_completed
"#)]
    Deep {
        /// The research question or product idea.
        query: String,

        /// Model to use (defaults to RESEARCH_MODEL or the built-in default).
        #[arg(short, long)]
        model: Option<String>,

        /// Total token budget, split across pipeline steps.
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Add a devil's-advocate critique step before synthesis.
        #[arg(long, env = "RESEARCH_DEVILS_ADVOCATE")]
        devils_advocate: bool,
    },

    /// List available models, sorted cheapest first.
    Models,

    /// Write default prompt templates to a directory for customization.
    #[command(after_help = r#"Examples:
  research-rs prompts                      # Write to ~/.config/research-rs/prompts
  research-rs prompts --dir ./my-prompts   # Write to a custom directory
"#)]
    Prompts {
        /// Target directory (defaults to ~/.config/research-rs/prompts).
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}
