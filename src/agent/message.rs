//! Provider-agnostic message types for LLM communication.
//!
//! These types decouple the orchestration logic from any specific LLM SDK,
//! allowing the same workflows to run against `OpenAI`, compatible proxies,
//! or the stub providers used in tests.

use serde::{Deserialize, Serialize};

/// Role of a chat message participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions.
    System,
    /// User input.
    User,
    /// Assistant response.
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: Role,
    /// Message content.
    pub content: String,
}

/// A chat completion request (provider-agnostic).
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model identifier (e.g., "gpt-5-mini-2025-08-07").
    pub model: String,
    /// Ordered conversation messages.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
}

/// Token usage statistics from a completion.
///
/// When the provider does not report usage, the model caller derives all
/// three counts from response length and sets `is_estimated`. Mixing exact
/// and estimated counts taints any aggregate, so the flag propagates
/// conservatively through [`crate::agent::report::aggregate_usage`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u32,
    /// Tokens generated in the completion.
    pub completion_tokens: u32,
    /// Total tokens used.
    pub total_tokens: u32,
    /// Whether the counts were estimated rather than provider-reported.
    #[serde(default)]
    pub is_estimated: bool,
}

impl TokenUsage {
    /// Builds an exact usage record from provider-reported counts.
    #[must_use]
    pub const fn exact(prompt_tokens: u32, completion_tokens: u32, total_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
            is_estimated: false,
        }
    }

    /// Estimates usage from prompt and completion character lengths.
    ///
    /// The divisor is a character-per-token proxy (default 3); it is a
    /// stated approximation, not an accounting guarantee.
    #[must_use]
    pub fn estimate(prompt_chars: usize, completion_chars: usize, divisor: usize) -> Self {
        let divisor = divisor.max(1);
        let prompt = u32::try_from(prompt_chars / divisor).unwrap_or(u32::MAX);
        let completion = u32::try_from(completion_chars / divisor).unwrap_or(u32::MAX);
        Self {
            prompt_tokens: prompt,
            completion_tokens: completion,
            total_tokens: prompt.saturating_add(completion),
            is_estimated: true,
        }
    }
}

/// A chat completion response (provider-agnostic).
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Generated text content.
    pub content: String,
    /// Token usage, when the provider reported it.
    pub usage: Option<TokenUsage>,
    /// Finish reason from the model (e.g., `"stop"`, `"length"`).
    pub finish_reason: Option<String>,
}

/// Creates a system message.
#[must_use]
pub fn system_message(content: &str) -> ChatMessage {
    ChatMessage {
        role: Role::System,
        content: content.to_string(),
    }
}

/// Creates a user message.
#[must_use]
pub fn user_message(content: &str) -> ChatMessage {
    ChatMessage {
        role: Role::User,
        content: content.to_string(),
    }
}
