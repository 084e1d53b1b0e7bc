use crate::error::ClientError;
use crate::types::{ChatResponse, FinishReason, Message, Role, TokenUsage};

use super::types::{DeepSeekChatResponse, DeepSeekUsage};

/// Maps a parsed completion payload onto the caller-facing response type.
///
/// The endpoint always answers with exactly one choice; a payload without one
/// is malformed.
pub(crate) fn map_response(resp: DeepSeekChatResponse) -> Result<ChatResponse, ClientError> {
    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::malformed("completion response contained no choices"))?;
    let message = choice
        .message
        .ok_or_else(|| ClientError::malformed("completion choice carried no message"))?;

    let role = message.role.map(Role).unwrap_or_else(Role::assistant);
    Ok(ChatResponse {
        message: Message {
            role,
            content: message.content.unwrap_or_default(),
        },
        reasoning: message.reasoning_content,
        model: resp.model,
        usage: resp.usage.map(convert_usage),
        finish_reason: choice.finish_reason.as_deref().map(convert_finish_reason),
    })
}

pub(crate) fn convert_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "length" => FinishReason::Length,
        "content_filter" => FinishReason::ContentFilter,
        "insufficient_system_resource" => FinishReason::InsufficientSystemResource,
        other => FinishReason::Other(other.to_string()),
    }
}

pub(crate) fn convert_usage(usage: DeepSeekUsage) -> TokenUsage {
    TokenUsage {
        prompt_tokens: usage.prompt_tokens,
        completion_tokens: usage.completion_tokens,
        reasoning_tokens: usage
            .completion_tokens_details
            .and_then(|details| details.reasoning_tokens),
        total_tokens: usage.total_tokens,
        cached_prompt_tokens: usage.prompt_cache_hit_tokens,
    }
}
