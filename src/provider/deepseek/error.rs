use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ClientError;

/// Maps a non-2xx completion response onto the client error taxonomy.
///
/// DeepSeek reports failures in the OpenAI error envelope; when the body parses,
/// the inner message is used for credential and throttling errors. Every other
/// status carries the status code and raw body verbatim.
pub(crate) fn parse_deepseek_error(
    status: u16,
    body: &str,
    retry_after: Option<Duration>,
) -> ClientError {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<InnerError>,
    }
    #[derive(Deserialize)]
    struct InnerError {
        message: Option<String>,
        #[allow(dead_code)]
        r#type: Option<String>,
        code: Option<Value>,
    }

    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .map(|error| {
            let mut message = error.message.unwrap_or_else(|| "unknown error".to_string());
            if let Some(code) = error.code {
                message = format!("{message} ({code})");
            }
            message
        });

    match status {
        401 | 403 => ClientError::Unauthorized {
            message: message.unwrap_or_else(|| body.to_string()),
        },
        429 => ClientError::RateLimit {
            message: message.unwrap_or_else(|| body.to_string()),
            retry_after,
        },
        _ => ClientError::Remote {
            status,
            body: body.to_string(),
        },
    }
}

/// Extracts the `Retry-After` header (in seconds) if present.
///
/// HTTP-date values are ignored; the endpoint uses the numeric form.
pub(crate) fn retry_after_from_headers(headers: &HashMap<String, String>) -> Option<Duration> {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("retry-after"))
        .and_then(|(_, value)| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
