use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures_core::Stream;
use serde::Serialize;

use crate::error::ClientError;
use crate::types::{ChatChunk, ChatRequest, ChatResponse};

pub mod deepseek;

/// Lazy, finite stream of completion fragments.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<ChatChunk, ClientError>> + Send>>;

/// Interface implemented by chat-completion backends.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Submits a full request and awaits the complete response.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ClientError>;

    /// Submits a request and returns incremental fragments.
    async fn stream_chat(&self, request: ChatRequest) -> Result<ChatStream, ClientError>;

    /// Describes the provider for registry and configuration tooling.
    fn metadata(&self) -> ProviderMetadata;

    /// Provider identifier such as `deepseek`.
    fn name(&self) -> &'static str;
}

/// Thread-safe provider handle.
pub type DynProvider = Arc<dyn ChatProvider>;

/// Registry descriptor advertised by a provider.
///
/// Configuration front-ends use this to render setup flows: which variables
/// exist, which are secret, and which models are known to work.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderMetadata {
    /// Stable identifier used in provider selectors.
    pub id: &'static str,
    /// Human-readable display name.
    pub display_name: &'static str,
    /// Short description of the backend.
    pub description: &'static str,
    /// Model used when no selection variable is set.
    pub default_model: &'static str,
    /// Models known to work with this provider.
    pub known_models: Vec<&'static str>,
    /// Link to the upstream API documentation.
    pub doc_url: &'static str,
    /// Environment variables the provider reads.
    pub config_keys: Vec<ConfigKey>,
}

/// Single environment variable in a provider's configuration contract.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigKey {
    /// Variable name.
    pub name: &'static str,
    /// Whether resolution fails when the variable is absent.
    pub required: bool,
    /// Whether the value is a secret and must not be echoed.
    pub secret: bool,
    /// Default applied when the variable is unset.
    pub default: Option<&'static str>,
}

impl ConfigKey {
    pub fn new(
        name: &'static str,
        required: bool,
        secret: bool,
        default: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            required,
            secret,
            default,
        }
    }
}
