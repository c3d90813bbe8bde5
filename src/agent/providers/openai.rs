//! `OpenAI` provider implementation using the `async-openai` crate.
//!
//! Supports any `OpenAI`-compatible API (`OpenAI`, Azure, local proxies)
//! via the base URL override in [`AgentConfig`]. Throttling responses are
//! classified into [`AgentError::Throttled`] so the retrying model caller
//! can back off; everything else surfaces as [`AgentError::ApiRequest`].

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestUserMessage, CreateChatCompletionRequest,
};
use async_trait::async_trait;

use crate::agent::config::AgentConfig;
use crate::agent::message::{ChatMessage, ChatRequest, ChatResponse, Role, TokenUsage};
use crate::agent::provider::LlmProvider;
use crate::error::AgentError;

/// `OpenAI`-compatible LLM provider.
///
/// Wraps the `async-openai` client for chat completions and model listing.
/// Compatible with any API that follows the `OpenAI` chat completion spec.
pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
}

impl OpenAiProvider {
    /// Creates a new provider from agent configuration.
    #[must_use]
    pub fn new(config: &AgentConfig) -> Self {
        let mut openai_config = OpenAIConfig::new().with_api_key(&config.api_key);

        if let Some(ref base_url) = config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        Self {
            client: Client::with_config(openai_config),
        }
    }

    /// Converts our message type to the `OpenAI` SDK type.
    fn convert_message(msg: &ChatMessage) -> ChatCompletionRequestMessage {
        match msg.role {
            Role::System => {
                ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                    content: async_openai::types::ChatCompletionRequestSystemMessageContent::Text(
                        msg.content.clone(),
                    ),
                    name: None,
                })
            }
            Role::User | Role::Assistant => {
                ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                    content: async_openai::types::ChatCompletionRequestUserMessageContent::Text(
                        msg.content.clone(),
                    ),
                    name: None,
                })
            }
        }
    }

    /// Builds an `OpenAI` chat completion request from our generic request.
    fn build_request(request: &ChatRequest) -> CreateChatCompletionRequest {
        let messages: Vec<_> = request.messages.iter().map(Self::convert_message).collect();

        CreateChatCompletionRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature.filter(|&t| t != 0.0),
            max_completion_tokens: request.max_tokens,
            ..Default::default()
        }
    }

    /// Classifies an `async-openai` error into our taxonomy.
    ///
    /// Throttling signals vary across compatible backends, so classification
    /// matches on the error text: HTTP 429, rate-limit phrasing, quota
    /// exhaustion, and the Google-style `RESOURCE_EXHAUSTED` marker.
    fn map_error(err: &OpenAIError) -> AgentError {
        if let OpenAIError::ApiError(api) = err {
            let kind = api.r#type.as_deref().unwrap_or("");
            let lowered = api.message.to_lowercase();
            let throttled = kind.contains("rate_limit")
                || kind.contains("insufficient_quota")
                || lowered.contains("rate limit")
                || lowered.contains("quota")
                || api.message.contains("429")
                || api.message.contains("RESOURCE_EXHAUSTED");

            if throttled {
                return AgentError::Throttled {
                    message: api.message.clone(),
                };
            }
            return AgentError::ApiRequest {
                message: api.message.clone(),
                status: None,
            };
        }

        AgentError::ApiRequest {
            message: err.to_string(),
            status: None,
        }
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("client", &"<async-openai::Client>")
            .finish()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AgentError> {
        let openai_request = Self::build_request(request);

        let response = self
            .client
            .chat()
            .create(openai_request)
            .await
            .map_err(|e| Self::map_error(&e))?;

        let choice = response.choices.first();

        let content = choice
            .and_then(|c| c.message.content.as_ref())
            .cloned()
            .unwrap_or_default();

        let finish_reason = choice.and_then(|c| {
            c.finish_reason
                .as_ref()
                .map(|fr| format!("{fr:?}").to_lowercase())
        });

        let usage = response.usage.map(|u| {
            TokenUsage::exact(u.prompt_tokens, u.completion_tokens, u.total_tokens)
        });

        Ok(ChatResponse {
            content,
            usage,
            finish_reason,
        })
    }

    async fn list_models(&self) -> Result<Vec<String>, AgentError> {
        let response = self
            .client
            .models()
            .list()
            .await
            .map_err(|e| Self::map_error(&e))?;

        Ok(response.data.into_iter().map(|m| m.id).collect())
    }
}
