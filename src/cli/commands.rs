//! CLI command implementations.
//!
//! Contains the business logic for each CLI command. Commands build the
//! research service from environment + CLI overrides, bridge into the
//! async core via a tokio runtime, and hand the result to the output
//! formatter.

use std::path::PathBuf;

use crate::agent::config::AgentConfig;
use crate::agent::prompt::PromptSet;
use crate::agent::request::ResearchRequest;
use crate::agent::service::ResearchService;
use crate::cli::output::{self, OutputFormat};
use crate::cli::parser::{Cli, Commands};
use crate::error::AgentError;

/// Executes the CLI command.
///
/// # Errors
///
/// Returns an [`AgentError`] when the command fails; the caller maps the
/// error class to an exit code and message.
pub fn execute(cli: &Cli) -> Result<String, AgentError> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Research {
            query,
            model,
            max_tokens,
        } => cmd_research(cli, query, model.as_deref(), *max_tokens, format),
        Commands::Deep {
            query,
            model,
            max_tokens,
            devils_advocate,
        } => cmd_deep(
            cli,
            query,
            model.as_deref(),
            *max_tokens,
            *devils_advocate,
            format,
        ),
        Commands::Models => cmd_models(cli, format),
        Commands::Prompts { dir } => cmd_prompts(dir.clone(), format),
    }
}

/// Builds the agent configuration from environment plus CLI overrides.
fn build_config(cli: &Cli, devils_advocate: bool) -> Result<AgentConfig, AgentError> {
    let mut builder = AgentConfig::builder().from_env();
    if let Some(ref dir) = cli.prompt_dir {
        builder = builder.prompt_dir(dir);
    }
    if devils_advocate {
        builder = builder.devils_advocate(true);
    }
    builder.build()
}

/// Creates the async runtime bridging the sync CLI into the async core.
fn runtime() -> Result<tokio::runtime::Runtime, AgentError> {
    tokio::runtime::Runtime::new().map_err(|e| AgentError::Orchestration {
        message: format!("failed to create async runtime: {e}"),
    })
}

fn cmd_research(
    cli: &Cli,
    query: &str,
    model: Option<&str>,
    max_tokens: Option<u32>,
    format: OutputFormat,
) -> Result<String, AgentError> {
    let config = build_config(cli, false)?;
    let service = ResearchService::from_config(config)?;
    let request = ResearchRequest::new(query, model, max_tokens, service.config())?;

    let report = runtime()?.block_on(service.standard(&request))?;

    output::format_standard(&report, &request.model, format)
        .map_err(|message| AgentError::Orchestration { message })
}

fn cmd_deep(
    cli: &Cli,
    query: &str,
    model: Option<&str>,
    max_tokens: Option<u32>,
    devils_advocate: bool,
    format: OutputFormat,
) -> Result<String, AgentError> {
    let config = build_config(cli, devils_advocate)?;
    let service = ResearchService::from_config(config)?;
    let request = ResearchRequest::new(query, model, max_tokens, service.config())?;

    let report = runtime()?.block_on(service.deep(&request))?;

    output::format_deep(&report, &request.model, format)
        .map_err(|message| AgentError::Orchestration { message })
}

fn cmd_models(cli: &Cli, format: OutputFormat) -> Result<String, AgentError> {
    let config = build_config(cli, false)?;
    let service = ResearchService::from_config(config)?;

    let models = runtime()?.block_on(service.list_models());

    output::format_models(&models, format).map_err(|message| AgentError::Orchestration { message })
}

/// Writes the default prompt templates for customization. Needs no API
/// key and issues no provider calls.
fn cmd_prompts(dir: Option<PathBuf>, format: OutputFormat) -> Result<String, AgentError> {
    let target = dir
        .or_else(PromptSet::default_dir)
        .ok_or_else(|| AgentError::Orchestration {
            message: "cannot determine a prompt directory; pass --dir".to_string(),
        })?;

    let written = PromptSet::write_defaults(&target).map_err(|e| AgentError::Orchestration {
        message: format!("failed to write prompt templates: {e}"),
    })?;

    match format {
        OutputFormat::Text => {
            if written.is_empty() {
                Ok(format!(
                    "All prompt templates already exist in {}",
                    target.display()
                ))
            } else {
                Ok(format!(
                    "Wrote {} prompt template(s) to {}",
                    written.len(),
                    target.display()
                ))
            }
        }
        OutputFormat::Json => {
            let paths: Vec<String> = written
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            serde_json::to_string_pretty(&serde_json::json!({
                "dir": target.display().to_string(),
                "written": paths,
            }))
            .map_err(|e| AgentError::Orchestration {
                message: e.to_string(),
            })
        }
    }
}
