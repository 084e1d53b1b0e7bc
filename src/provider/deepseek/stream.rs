use futures_util::StreamExt;

use crate::error::ClientError;
use crate::http::HttpBodyStream;
use crate::provider::ChatStream;
use crate::stream::{SseEvent, SseStream};
use crate::types::ChatChunk;

use super::response::{convert_finish_reason, convert_usage};
use super::types::DeepSeekStreamChunk;

/// Adapts the SSE event stream into completion fragments.
///
/// Each `data:` payload is one chat-completion chunk; `[DONE]` becomes the
/// explicit terminal fragment, after which the stream is exhausted.
pub(crate) fn create_stream(body: HttpBodyStream) -> ChatStream {
    let chunks = SseStream::new(body).map(|event| match event {
        Ok(SseEvent::Data(data)) => parse_chunk(&data),
        Ok(SseEvent::Done) => Ok(ChatChunk::terminal()),
        Err(err) => Err(err),
    });
    Box::pin(chunks)
}

/// Drains a streaming body into a string, for non-2xx error payloads.
pub(crate) async fn collect_stream_text(mut body: HttpBodyStream) -> Result<String, ClientError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = body.next().await {
        bytes.extend_from_slice(&chunk?);
    }
    String::from_utf8(bytes)
        .map_err(|err| ClientError::malformed(format!("failed to decode error body: {err}")))
}

fn parse_chunk(data: &str) -> Result<ChatChunk, ClientError> {
    let chunk: DeepSeekStreamChunk = serde_json::from_str(data)
        .map_err(|err| ClientError::malformed(format!("failed to parse stream chunk: {err}")))?;

    let mut delta = None;
    let mut reasoning_delta = None;
    let mut finish_reason = None;
    if let Some(choice) = chunk.choices.into_iter().next() {
        finish_reason = choice.finish_reason.as_deref().map(convert_finish_reason);
        if let Some(wire_delta) = choice.delta {
            delta = wire_delta.content.filter(|text| !text.is_empty());
            reasoning_delta = wire_delta.reasoning_content.filter(|text| !text.is_empty());
        }
    }

    Ok(ChatChunk {
        delta,
        reasoning_delta,
        finish_reason,
        usage: chunk.usage.map(convert_usage),
        is_terminal: false,
    })
}
