use std::collections::HashMap;

use crate::config::ModelRole;
use crate::error::ClientError;
use crate::provider::{ChatStream, DynProvider, ProviderMetadata};
use crate::types::{ChatRequest, ChatResponse};

/// Role-keyed entry point for chat-completion calls.
///
/// Holds one provider per registered [`ModelRole`]; every call is independent
/// and stateless, so lead and planner roles can be used concurrently without
/// coordination.
pub struct ChatClient {
    providers: HashMap<ModelRole, DynProvider>,
}

impl ChatClient {
    /// Creates a builder for registering role providers.
    pub fn builder() -> ChatClientBuilder {
        ChatClientBuilder {
            providers: HashMap::new(),
        }
    }

    /// Sends a full request and awaits the complete response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] for an unregistered role; otherwise
    /// forwards the provider's error.
    pub async fn chat(
        &self,
        role: ModelRole,
        request: ChatRequest,
    ) -> Result<ChatResponse, ClientError> {
        let provider = self.get_provider(role)?;
        provider.chat(request).await
    }

    /// Sends a request and returns incremental fragments.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] for an unregistered role; otherwise
    /// forwards the provider's error.
    pub async fn stream_chat(
        &self,
        role: ModelRole,
        request: ChatRequest,
    ) -> Result<ChatStream, ClientError> {
        let provider = self.get_provider(role)?;
        provider.stream_chat(request).await
    }

    /// Returns the currently registered roles.
    pub fn roles(&self) -> Vec<ModelRole> {
        self.providers.keys().copied().collect()
    }

    /// Describes the provider registered for a role.
    pub fn metadata(&self, role: ModelRole) -> Result<ProviderMetadata, ClientError> {
        let provider = self.get_provider(role)?;
        Ok(provider.metadata())
    }

    fn get_provider(&self, role: ModelRole) -> Result<DynProvider, ClientError> {
        self.providers
            .get(&role)
            .cloned()
            .ok_or_else(|| ClientError::validation(format!("no provider registered for role: {role}")))
    }
}

/// Builder registering one provider per role.
pub struct ChatClientBuilder {
    providers: HashMap<ModelRole, DynProvider>,
}

impl ChatClientBuilder {
    /// Registers the provider serving a role.
    pub fn register_role(mut self, role: ModelRole, provider: DynProvider) -> Self {
        self.providers.insert(role, provider);
        self
    }

    /// Builds the final [`ChatClient`].
    pub fn build(self) -> ChatClient {
        ChatClient {
            providers: self.providers,
        }
    }
}
