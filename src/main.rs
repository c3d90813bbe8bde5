//! research-rs binary entry point.
//!
//! Loads the environment, initializes tracing, parses the CLI, and maps
//! error classes to exit codes: validation and rate-limit failures are
//! client errors (exit 2), provider and orchestration failures are server
//! errors (exit 1).

// The CLI binary talks to the terminal.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;

use clap::Parser;
use research_rs::cli::{Cli, execute};
use research_rs::error::AgentError;
use tracing_subscriber::EnvFilter;

/// Exit code for errors the caller can fix (bad input, wait and retry).
const EXIT_CLIENT_ERROR: u8 = 2;
/// Exit code for upstream or internal failures.
const EXIT_SERVER_ERROR: u8 = 1;

fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "research_rs=debug"
        } else {
            "research_rs=warn"
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match execute(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Maps an error class to the process exit code.
const fn exit_code(err: &AgentError) -> u8 {
    match err {
        AgentError::Validation { .. }
        | AgentError::RateLimited { .. }
        | AgentError::QuotaExceeded { .. }
        | AgentError::ApiKeyMissing => EXIT_CLIENT_ERROR,
        _ => EXIT_SERVER_ERROR,
    }
}
