use serde_json::{Map, Value, json};

use crate::error::ClientError;
use crate::types::{ChatRequest, Message};

/// Builds the JSON body for a chat-completion POST.
///
/// The body follows the OpenAI chat-completion schema: `model`, `messages`, a
/// `stream` indicator, and whichever sampling knobs the caller set.
pub(crate) fn build_request_body(
    request: &ChatRequest,
    model: &str,
    stream: bool,
) -> Result<Value, ClientError> {
    if request.messages.is_empty() {
        return Err(ClientError::validation(
            "chat request requires at least one message",
        ));
    }

    let mut body = Map::new();
    body.insert("model".to_string(), Value::String(model.to_string()));
    body.insert(
        "messages".to_string(),
        Value::Array(request.messages.iter().map(convert_message).collect()),
    );
    if let Some(temperature) = request.options.temperature {
        body.insert("temperature".to_string(), Value::from(temperature));
    }
    if let Some(top_p) = request.options.top_p {
        body.insert("top_p".to_string(), Value::from(top_p));
    }
    if let Some(max_tokens) = request.options.max_output_tokens {
        body.insert("max_tokens".to_string(), Value::from(max_tokens));
    }
    if let Some(penalty) = request.options.frequency_penalty {
        body.insert("frequency_penalty".to_string(), Value::from(penalty));
    }
    if let Some(penalty) = request.options.presence_penalty {
        body.insert("presence_penalty".to_string(), Value::from(penalty));
    }
    if let Some(stop) = &request.options.stop {
        body.insert(
            "stop".to_string(),
            Value::Array(stop.iter().cloned().map(Value::String).collect()),
        );
    }
    body.insert("stream".to_string(), Value::Bool(stream));
    Ok(Value::Object(body))
}

fn convert_message(message: &Message) -> Value {
    json!({
        "role": message.role.0,
        "content": message.content,
    })
}
