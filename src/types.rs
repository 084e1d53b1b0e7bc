//! Data structures modeling chat-completion requests and responses.
//!
//! The DeepSeek API speaks the OpenAI chat-completion dialect; these types keep
//! the caller-facing surface independent of the exact wire layout.

use serde::{Deserialize, Serialize};

/// Chat role string compatible with OpenAI-style semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(pub String);

impl Role {
    pub fn system() -> Self {
        Self("system".to_string())
    }

    pub fn user() -> Self {
        Self("user".to_string())
    }

    pub fn assistant() -> Self {
        Self("assistant".to_string())
    }
}

/// Single role-tagged message entry in a conversation.
///
/// # Examples
///
/// ```
/// # use shinkai_llm::types::{Message, Role};
/// let msg = Message {
///     role: Role::user(),
///     content: "Summarize Rust traits.".to_string(),
/// };
/// assert_eq!(msg.role, Role::user());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role associated with this message.
    pub role: Role,
    /// Plain UTF-8 text content.
    pub content: String,
}

impl Message {
    /// Builds a system message from text.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::system(),
            content: content.into(),
        }
    }

    /// Builds a user message from text.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::user(),
            content: content.into(),
        }
    }

    /// Builds an assistant message from text.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::assistant(),
            content: content.into(),
        }
    }
}

/// Chat request accepted by [`crate::client::ChatClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Ordered list of messages to send.
    pub messages: Vec<Message>,
    /// Fine-grained sampling options.
    #[serde(default)]
    pub options: ChatOptions,
}

impl ChatRequest {
    /// Builds a request carrying the given messages with default options.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            options: ChatOptions::default(),
        }
    }
}

/// Tunable options forwarded to the completion endpoint.
///
/// Every field is optional so callers only set knobs they care about; unset
/// fields fall back to the endpoint's documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChatOptions {
    /// Model identifier override; defaults to the role's resolved model.
    pub model: Option<String>,
    /// Sampling temperature, typically within `0.0..=2.0`.
    pub temperature: Option<f32>,
    /// Nucleus sampling parameter where `1.0` disables the filter.
    pub top_p: Option<f32>,
    /// Maximum number of output tokens returned by the endpoint.
    pub max_output_tokens: Option<u32>,
    /// Discourages repeating identical tokens (`-2.0..=2.0`).
    pub frequency_penalty: Option<f32>,
    /// Encourages the model to talk about new topics (`-2.0..=2.0`).
    pub presence_penalty: Option<f32>,
    /// Sequences that stop generation when produced.
    pub stop: Option<Vec<String>>,
}

/// Token usage accounting reported by the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: Option<u64>,
    /// Tokens produced in the completion.
    pub completion_tokens: Option<u64>,
    /// Tokens spent on reasoning chains (`deepseek-reasoner`).
    pub reasoning_tokens: Option<u64>,
    /// Total tokens across prompt and completion.
    pub total_tokens: Option<u64>,
    /// Prompt tokens served from the provider-side cache.
    pub cached_prompt_tokens: Option<u64>,
}

/// Why a completion stopped generating content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    /// The endpoint ran out of inference capacity for the request.
    InsufficientSystemResource,
    Other(String),
}

/// Completed chat response returned by a provider.
///
/// # Examples
///
/// ```
/// # use shinkai_llm::types::{ChatResponse, Message};
/// let response = ChatResponse {
///     message: Message::assistant("Hello"),
///     reasoning: None,
///     model: Some("deepseek-chat".into()),
///     usage: None,
///     finish_reason: None,
/// };
/// assert_eq!(response.message.content, "Hello");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Completed assistant message.
    pub message: Message,
    /// Reasoning trace emitted alongside the answer, when the model produces one.
    pub reasoning: Option<String>,
    /// Effective model identifier reported by the endpoint.
    pub model: Option<String>,
    /// Token usage accounting.
    pub usage: Option<TokenUsage>,
    /// Why the response stopped.
    pub finish_reason: Option<FinishReason>,
}

/// Streaming fragment representing incremental response data.
///
/// Streaming calls emit one or more chunks until `is_terminal` becomes `true`.
/// Consumers concatenate `delta` fragments in arrival order to reconstruct the
/// full message; the terminal chunk carries no content and marks end-of-stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChunk {
    /// Text fragment appended to the message, if any.
    pub delta: Option<String>,
    /// Reasoning-trace fragment, if any.
    pub reasoning_delta: Option<String>,
    /// Why the response stopped, reported on the closing data chunk.
    pub finish_reason: Option<FinishReason>,
    /// Usage totals, reported on the final data chunks when available.
    pub usage: Option<TokenUsage>,
    /// Indicates whether this is the explicit end marker.
    pub is_terminal: bool,
}

impl ChatChunk {
    /// The explicit end-of-stream marker chunk.
    pub(crate) fn terminal() -> Self {
        Self {
            delta: None,
            reasoning_delta: None,
            finish_reason: None,
            usage: None,
            is_terminal: true,
        }
    }
}
