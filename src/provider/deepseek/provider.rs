use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::error::ClientError;
use crate::http::{DynHttpTransport, HttpRequest, HttpResponse, HttpStreamResponse};
use crate::provider::{ChatProvider, ChatStream, ConfigKey, ProviderMetadata};
use crate::types::{ChatRequest, ChatResponse};

use super::error::{parse_deepseek_error, retry_after_from_headers};
use super::request::build_request_body;
use super::response::map_response;
use super::stream::{collect_stream_text, create_stream};
use super::types::{DeepSeekChatResponse, DeepSeekModelList};

/// Model paired with the lead role when nothing is selected.
pub const DEEPSEEK_DEFAULT_MODEL: &str = "deepseek-chat";
/// Model paired with the planner role when nothing is selected.
pub const DEEPSEEK_DEFAULT_PLANNER_MODEL: &str = "deepseek-reasoner";

pub const DEEPSEEK_KNOWN_MODELS: &[&str] = &["deepseek-chat", "deepseek-reasoner"];

pub const DEEPSEEK_DOC_URL: &str = "https://platform.deepseek.com/api-docs";

/// DeepSeek chat-completion provider.
///
/// Holds an immutable [`ProviderConfig`] resolved at startup; every call issues
/// a single HTTP request against `{host}/{base_path}` and maps the outcome onto
/// the client error taxonomy.
pub struct DeepSeekProvider {
    transport: DynHttpTransport,
    config: ProviderConfig,
}

impl DeepSeekProvider {
    /// Creates a provider from a resolved configuration.
    pub fn new(transport: DynHttpTransport, config: ProviderConfig) -> Self {
        Self { transport, config }
    }

    /// Read access to the resolved configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Completion endpoint URL with exactly one slash between host and path.
    pub(crate) fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.config.host.trim_end_matches('/'),
            self.config.base_path.trim_start_matches('/')
        )
    }

    fn models_endpoint(&self) -> String {
        format!("{}/v1/models", self.config.host.trim_end_matches('/'))
    }

    fn build_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.config.api_key),
        );
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "application/json".to_string());
        if let Some(custom) = &self.config.custom_headers {
            for (name, value) in custom {
                headers.insert(name.clone(), value.clone());
            }
        }
        headers
    }

    fn resolve_model(&self, request: &ChatRequest) -> String {
        request
            .options
            .model
            .clone()
            .unwrap_or_else(|| self.config.model.clone())
    }

    async fn send_request(&self, body: Value) -> Result<HttpResponse, ClientError> {
        let payload = serde_json::to_vec(&body)
            .map_err(|err| ClientError::validation(format!("failed to serialize request: {err}")))?;
        let request = HttpRequest::post_json(self.endpoint(), payload)
            .with_headers(self.build_headers())
            .with_timeout(self.config.timeout);
        self.transport.send(request).await
    }

    async fn send_stream_request(&self, body: Value) -> Result<HttpStreamResponse, ClientError> {
        let payload = serde_json::to_vec(&body)
            .map_err(|err| ClientError::validation(format!("failed to serialize request: {err}")))?;
        let request = HttpRequest::post_json(self.endpoint(), payload)
            .with_headers(self.build_headers())
            .with_timeout(self.config.timeout);
        self.transport.send_stream(request).await
    }

    fn ensure_success(&self, response: HttpResponse) -> Result<String, ClientError> {
        let status = response.status;
        let retry_after = retry_after_from_headers(&response.headers);
        let text = response.into_string()?;
        if (200..300).contains(&status) {
            Ok(text)
        } else {
            Err(parse_deepseek_error(status, &text, retry_after))
        }
    }

    fn try_parse<T: DeserializeOwned>(&self, text: &str) -> Result<T, ClientError> {
        serde_json::from_str(text)
            .map_err(|err| ClientError::malformed(format!("failed to parse response: {err}")))
    }

    /// Lists the model identifiers the endpoint currently serves, sorted.
    ///
    /// # Errors
    ///
    /// Propagates transport failures and maps an error envelope in the listing
    /// payload to [`ClientError::Unauthorized`], matching how the endpoint
    /// reports credential problems on this route.
    pub async fn list_models(&self) -> Result<Vec<String>, ClientError> {
        let request = HttpRequest::get(self.models_endpoint())
            .with_headers(self.build_headers())
            .with_timeout(self.config.timeout);
        let response = self.transport.send(request).await?;
        let text = self.ensure_success(response)?;

        let json: Value = self.try_parse(&text)?;
        if let Some(error) = json.get("error") {
            let message = error
                .get("message")
                .and_then(|value| value.as_str())
                .unwrap_or("unknown error");
            return Err(ClientError::Unauthorized {
                message: message.to_string(),
            });
        }

        let list: DeepSeekModelList = self.try_parse(&text)?;
        let mut models: Vec<String> = list.data.into_iter().map(|entry| entry.id).collect();
        models.sort();
        Ok(models)
    }
}

#[async_trait]
impl ChatProvider for DeepSeekProvider {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ClientError> {
        let model = self.resolve_model(&request);
        let body = build_request_body(&request, &model, false)?;
        let response = self.send_request(body).await?;
        let text = self.ensure_success(response)?;
        let parsed: DeepSeekChatResponse = self.try_parse(&text)?;
        map_response(parsed)
    }

    async fn stream_chat(&self, request: ChatRequest) -> Result<ChatStream, ClientError> {
        let model = self.resolve_model(&request);
        let body = build_request_body(&request, &model, true)?;
        let response = self.send_stream_request(body).await?;
        if !(200..300).contains(&response.status) {
            let retry_after = retry_after_from_headers(&response.headers);
            let text = collect_stream_text(response.body).await?;
            return Err(parse_deepseek_error(response.status, &text, retry_after));
        }
        Ok(create_stream(response.body))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            id: "deepseek",
            display_name: "DeepSeek",
            description: "DeepSeek V3 and R1 models with advanced reasoning capabilities",
            default_model: DEEPSEEK_DEFAULT_MODEL,
            known_models: DEEPSEEK_KNOWN_MODELS.to_vec(),
            doc_url: DEEPSEEK_DOC_URL,
            config_keys: vec![
                ConfigKey::new("DEEPSEEK_API_KEY", true, true, None),
                ConfigKey::new("DEEPSEEK_HOST", false, false, Some("https://api.deepseek.com")),
                ConfigKey::new("DEEPSEEK_BASE_PATH", false, false, Some("v1/chat/completions")),
                ConfigKey::new("DEEPSEEK_CUSTOM_HEADERS", false, true, None),
                ConfigKey::new("DEEPSEEK_TIMEOUT", false, false, Some("600")),
            ],
        }
    }

    fn name(&self) -> &'static str {
        "deepseek"
    }
}
