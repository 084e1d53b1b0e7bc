use std::time::Duration;

use thiserror::Error;

/// Failures raised while resolving provider configuration from the environment.
///
/// Every variant is fatal to session setup: configuration is resolved once at
/// startup, and a broken environment should stop the process before any request
/// is issued.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The required `DEEPSEEK_API_KEY` variable is absent or empty.
    #[error("missing api key: DEEPSEEK_API_KEY is not set")]
    MissingApiKey,
    /// `DEEPSEEK_TIMEOUT` is present but does not parse as a positive integer.
    #[error("invalid timeout: {value:?} is not a positive number of seconds")]
    InvalidTimeout {
        /// Raw value found in the environment, kept verbatim for diagnostics.
        value: String,
    },
    /// A role selector names a provider this crate does not implement.
    #[error("unknown provider: {name}")]
    UnknownProvider {
        /// Provider name taken from the selector variable.
        name: String,
    },
}

/// Aggregates every per-call failure mode exposed by the chat client.
///
/// Callers can match on the specific variant to decide whether to surface the
/// message, back off, or abort the conversation turn. No variant is retried
/// internally; each call is a single attempt.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-layer or networking failure below HTTP.
    #[error("transport error: {message}")]
    Transport { message: String },
    /// No response arrived within the configured timeout.
    #[error("request timed out after {seconds}s")]
    Timeout {
        /// Configured timeout that elapsed, in seconds.
        seconds: u64,
    },
    /// The endpoint rejected the credential (HTTP 401/403).
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },
    /// The endpoint throttled the request (HTTP 429).
    #[error("rate limited: {message}")]
    RateLimit {
        /// Raw message returned by the upstream endpoint.
        message: String,
        /// Wait duration suggested via `Retry-After`, if present.
        retry_after: Option<Duration>,
    },
    /// Any other non-2xx status, carried verbatim.
    #[error("remote error: status {status}: {body}")]
    Remote {
        /// Upstream HTTP status code.
        status: u16,
        /// Upstream response body, unmodified.
        body: String,
    },
    /// A 2xx body that cannot be parsed per the expected schema.
    #[error("malformed response: {message}")]
    Malformed { message: String },
    /// The request could not be constructed in the first place.
    #[error("invalid request: {message}")]
    Validation { message: String },
}

impl ClientError {
    /// Creates a [`ClientError::Transport`] from a textual description.
    ///
    /// The helper keeps call sites concise and guarantees consistent formatting
    /// of transport failures across the crate.
    ///
    /// # Examples
    ///
    /// ```
    /// use shinkai_llm::error::ClientError;
    ///
    /// let err = ClientError::transport("dns lookup failed");
    /// assert!(matches!(err, ClientError::Transport { .. }));
    /// ```
    pub fn transport<T: Into<String>>(message: T) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a [`ClientError::Malformed`] from a textual description.
    ///
    /// # Examples
    ///
    /// ```
    /// use shinkai_llm::error::ClientError;
    ///
    /// let err = ClientError::malformed("missing choices array");
    /// assert!(matches!(err, ClientError::Malformed { .. }));
    /// ```
    pub fn malformed<T: Into<String>>(message: T) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates a [`ClientError::Validation`] from a textual description.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
