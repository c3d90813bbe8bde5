//! LLM research agent for research-rs.
//!
//! Provides rate-limited, retrying access to a chat-completion provider
//! and two research modes built on top of it: a single-call standard mode
//! and a sequential multi-step deep-research pipeline.
//!
//! # Architecture
//!
//! ```text
//! Research request → ResearchService
//!   ├── RateLimiter (local sliding window, admit or reject)
//!   ├── Standard → ModelCaller → one provider call → one-section report
//!   └── Deep → DeepResearchWorkflow
//!         plan → market → users → competition → risks
//!           → [devil's advocate] → synthesize
//!         each step: ModelCaller (timeout, throttle retry, usage
//!         normalization); any failure aborts the run
//! ```
//!
//! Providers implement [`LlmProvider`] and are constructed by name via
//! [`client::create_provider`].

pub mod caller;
pub mod client;
pub mod config;
pub mod limiter;
pub mod message;
pub mod models;
pub mod prompt;
pub mod provider;
pub mod providers;
pub mod report;
pub mod request;
pub mod service;
pub mod workflow;

// Re-export key types
pub use caller::ModelCaller;
pub use config::AgentConfig;
pub use limiter::RateLimiter;
pub use message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
pub use models::ModelInfo;
pub use prompt::PromptSet;
pub use provider::LlmProvider;
pub use report::{ResearchReport, StepName, StepResult};
pub use request::ResearchRequest;
pub use service::ResearchService;
pub use workflow::DeepResearchWorkflow;
