//! research-rs: rate-limited LLM research orchestration.
//!
//! Turns a single research question into one or more calls to an
//! `OpenAI`-compatible LLM provider, producing either a single focused
//! answer (standard research) or a fixed multi-section structured report
//! (deep research).
//!
//! The orchestration core lives in [`agent`]:
//!
//! - [`agent::limiter`] — process-wide sliding-window rate limiter
//! - [`agent::caller`] — throttle-aware retrying model caller with usage
//!   normalization
//! - [`agent::workflow`] — the sequential deep-research pipeline
//! - [`agent::report`] — report assembly and usage aggregation
//! - [`agent::service`] — the boundary object callers talk to
//!
//! The [`cli`] module is a thin collaborator over the core: it parses
//! arguments, builds the service, and translates errors into actionable
//! messages.

pub mod agent;
pub mod cli;
pub mod error;

pub use agent::{
    AgentConfig, DeepResearchWorkflow, ModelCaller, RateLimiter, ResearchReport, ResearchRequest,
    ResearchService, TokenUsage,
};
pub use error::AgentError;
