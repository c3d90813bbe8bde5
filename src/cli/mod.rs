//! CLI layer for research-rs.
//!
//! Provides the command-line interface using clap, with commands for
//! standard research, deep research, model listing, and prompt scaffolding.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
