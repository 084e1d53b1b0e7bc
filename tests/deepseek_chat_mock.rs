use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use shinkai_llm::config::{EnvSnapshot, ModelRole, ProviderConfig, ProviderKind, build_client};
use shinkai_llm::error::ClientError;
use shinkai_llm::http::{
    HttpBodyStream, HttpRequest, HttpResponse, HttpStreamResponse, HttpTransport,
};
use shinkai_llm::provider::ChatProvider;
use shinkai_llm::provider::deepseek::DeepSeekProvider;
use shinkai_llm::types::{ChatRequest, FinishReason, Message};

/// Transport that replays a canned response and records the outgoing request.
struct CannedTransport {
    status: u16,
    headers: HashMap<String, String>,
    body: String,
    stream_chunks: Vec<String>,
    seen: Mutex<Option<HttpRequest>>,
}

impl CannedTransport {
    fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
            stream_chunks: Vec::new(),
            seen: Mutex::new(None),
        }
    }

    fn streaming(status: u16, chunks: Vec<&str>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: String::new(),
            stream_chunks: chunks.into_iter().map(str::to_string).collect(),
            seen: Mutex::new(None),
        }
    }

    fn seen_request(&self) -> HttpRequest {
        self.seen
            .lock()
            .expect("request mutex")
            .clone()
            .expect("transport should have been called")
    }
}

#[async_trait]
impl HttpTransport for CannedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        *self.seen.lock().expect("request mutex") = Some(request);
        Ok(HttpResponse {
            status: self.status,
            headers: self.headers.clone(),
            body: self.body.clone().into_bytes(),
        })
    }

    async fn send_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse, ClientError> {
        *self.seen.lock().expect("request mutex") = Some(request);
        let chunks: Vec<Result<Vec<u8>, ClientError>> = if self.stream_chunks.is_empty() {
            vec![Ok(self.body.clone().into_bytes())]
        } else {
            self.stream_chunks
                .iter()
                .map(|chunk| Ok(chunk.clone().into_bytes()))
                .collect()
        };
        let body: HttpBodyStream = Box::pin(stream::iter(chunks));
        Ok(HttpStreamResponse {
            status: self.status,
            headers: self.headers.clone(),
            body,
        })
    }
}

/// Transport that simulates an elapsed deadline.
struct TimeoutTransport;

#[async_trait]
impl HttpTransport for TimeoutTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        Err(ClientError::Timeout {
            seconds: request.timeout.map(|t| t.as_secs()).unwrap_or_default(),
        })
    }

    async fn send_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse, ClientError> {
        Err(ClientError::Timeout {
            seconds: request.timeout.map(|t| t.as_secs()).unwrap_or_default(),
        })
    }
}

fn test_config() -> ProviderConfig {
    ProviderConfig {
        provider: ProviderKind::DeepSeek,
        api_key: "sk-test".to_string(),
        host: "https://api.deepseek.com".to_string(),
        base_path: "v1/chat/completions".to_string(),
        timeout: Duration::from_secs(600),
        model: "deepseek-chat".to_string(),
        custom_headers: None,
    }
}

fn greeting_request() -> ChatRequest {
    ChatRequest::new(vec![
        Message::system("You are a helpful assistant."),
        Message::user("Hello!"),
    ])
}

const COMPLETION_BODY: &str = r#"{
    "id": "chatcmpl-123",
    "object": "chat.completion",
    "created": 1736000000,
    "model": "deepseek-chat",
    "choices": [{
        "index": 0,
        "message": {"role": "assistant", "content": "Hello from the mock."},
        "finish_reason": "stop"
    }],
    "usage": {
        "prompt_tokens": 12,
        "completion_tokens": 6,
        "total_tokens": 18,
        "prompt_cache_hit_tokens": 4
    }
}"#;

#[tokio::test]
async fn non_streaming_chat_returns_the_mock_content() {
    let transport = Arc::new(CannedTransport::new(200, COMPLETION_BODY));
    let provider = DeepSeekProvider::new(transport.clone(), test_config());

    let response = provider
        .chat(greeting_request())
        .await
        .expect("chat should succeed");

    assert_eq!(response.message.content, "Hello from the mock.");
    assert_eq!(response.model.as_deref(), Some("deepseek-chat"));
    assert!(matches!(response.finish_reason, Some(FinishReason::Stop)));
    let usage = response.usage.expect("usage present");
    assert_eq!(usage.prompt_tokens, Some(12));
    assert_eq!(usage.completion_tokens, Some(6));
    assert_eq!(usage.total_tokens, Some(18));
    assert_eq!(usage.cached_prompt_tokens, Some(4));
}

#[tokio::test]
async fn request_carries_bearer_token_endpoint_and_stream_flag() {
    let transport = Arc::new(CannedTransport::new(200, COMPLETION_BODY));
    let provider = DeepSeekProvider::new(transport.clone(), test_config());

    provider
        .chat(greeting_request())
        .await
        .expect("chat should succeed");

    let request = transport.seen_request();
    assert_eq!(request.url, "https://api.deepseek.com/v1/chat/completions");
    assert_eq!(
        request.headers.get("Authorization"),
        Some(&"Bearer sk-test".to_string())
    );
    assert_eq!(request.timeout, Some(Duration::from_secs(600)));

    let body: serde_json::Value =
        serde_json::from_slice(&request.seen_body()).expect("body is JSON");
    assert_eq!(body["model"], serde_json::json!("deepseek-chat"));
    assert_eq!(body["stream"], serde_json::json!(false));
    assert_eq!(body["messages"][1]["content"], serde_json::json!("Hello!"));
}

#[tokio::test]
async fn streaming_chat_concatenates_deltas_in_order() {
    let transport = Arc::new(CannedTransport::streaming(
        200,
        vec![
            "data: {\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\",\"content\":\"one\"}}]}\n\n",
            "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"two\"}}]}\n\n",
            "data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"three\"},\"finish_reason\":\"stop\"}]}\n\n",
            "data: [DONE]\n\n",
        ],
    ));
    let provider = DeepSeekProvider::new(transport, test_config());

    let mut stream = provider
        .stream_chat(greeting_request())
        .await
        .expect("stream should start");

    let mut collected = String::new();
    let mut saw_terminal = false;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.expect("chunk should be valid");
        if chunk.is_terminal {
            saw_terminal = true;
            break;
        }
        if let Some(delta) = chunk.delta {
            collected.push_str(&delta);
        }
    }

    assert_eq!(collected, "onetwothree");
    assert!(saw_terminal, "stream must end with the explicit marker");
    assert!(
        stream.next().await.is_none(),
        "stream is finite and non-restartable"
    );
}

#[tokio::test]
async fn streaming_request_sets_the_stream_flag() {
    let transport = Arc::new(CannedTransport::streaming(200, vec!["data: [DONE]\n\n"]));
    let provider = DeepSeekProvider::new(transport.clone(), test_config());

    let _ = provider
        .stream_chat(greeting_request())
        .await
        .expect("stream should start");

    let request = transport.seen_request();
    let body: serde_json::Value =
        serde_json::from_slice(&request.seen_body()).expect("body is JSON");
    assert_eq!(body["stream"], serde_json::json!(true));
}

#[tokio::test]
async fn unauthorized_status_maps_to_unauthorized() {
    let body = r#"{"error":{"message":"invalid api key","type":"authentication_error"}}"#;
    let transport = Arc::new(CannedTransport::new(401, body));
    let provider = DeepSeekProvider::new(transport, test_config());

    match provider.chat(greeting_request()).await {
        Err(ClientError::Unauthorized { message }) => {
            assert!(message.contains("invalid api key"), "got: {message}");
        }
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_maps_to_remote_with_status_and_body() {
    let transport = Arc::new(CannedTransport::new(500, "internal failure"));
    let provider = DeepSeekProvider::new(transport, test_config());

    match provider.chat(greeting_request()).await {
        Err(ClientError::Remote { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal failure");
        }
        other => panic!("expected Remote, got {other:?}"),
    }
}

#[tokio::test]
async fn streaming_error_status_drains_the_body_and_maps_the_error() {
    let body = r#"{"error":{"message":"invalid api key"}}"#;
    let transport = Arc::new(CannedTransport::streaming(401, vec![body]));
    let provider = DeepSeekProvider::new(transport, test_config());

    match provider.stream_chat(greeting_request()).await {
        Err(ClientError::Unauthorized { message }) => {
            assert!(message.contains("invalid api key"), "got: {message}");
        }
        Ok(_) => panic!("expected Unauthorized, got Ok(stream)"),
        Err(other) => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_success_body_maps_to_malformed() {
    let transport = Arc::new(CannedTransport::new(200, "not json at all"));
    let provider = DeepSeekProvider::new(transport, test_config());

    match provider.chat(greeting_request()).await {
        Err(ClientError::Malformed { message }) => {
            assert!(message.contains("failed to parse"), "got: {message}");
        }
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[tokio::test]
async fn elapsed_deadline_surfaces_as_timeout() {
    let provider = DeepSeekProvider::new(Arc::new(TimeoutTransport), test_config());

    match provider.chat(greeting_request()).await {
        Err(ClientError::Timeout { seconds }) => assert_eq!(seconds, 600),
        other => panic!("expected Timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_status_carries_retry_after() {
    let mut transport = CannedTransport::new(429, r#"{"error":{"message":"slow down"}}"#);
    transport
        .headers
        .insert("retry-after".to_string(), "12".to_string());
    let provider = DeepSeekProvider::new(Arc::new(transport), test_config());

    match provider.chat(greeting_request()).await {
        Err(ClientError::RateLimit {
            message,
            retry_after,
        }) => {
            assert!(message.contains("slow down"), "got: {message}");
            assert_eq!(retry_after, Some(Duration::from_secs(12)));
        }
        other => panic!("expected RateLimit, got {other:?}"),
    }
}

#[tokio::test]
async fn list_models_returns_sorted_identifiers() {
    let body = r#"{"object":"list","data":[{"id":"deepseek-reasoner","object":"model"},{"id":"deepseek-chat","object":"model"}]}"#;
    let transport = Arc::new(CannedTransport::new(200, body));
    let provider = DeepSeekProvider::new(transport.clone(), test_config());

    let models = provider.list_models().await.expect("models");
    assert_eq!(models, vec!["deepseek-chat", "deepseek-reasoner"]);

    let request = transport.seen_request();
    assert_eq!(request.url, "https://api.deepseek.com/v1/models");
}

#[tokio::test]
async fn list_models_error_envelope_maps_to_unauthorized() {
    let body = r#"{"error":{"message":"bad credential"}}"#;
    let transport = Arc::new(CannedTransport::new(200, body));
    let provider = DeepSeekProvider::new(transport, test_config());

    match provider.list_models().await {
        Err(ClientError::Unauthorized { message }) => assert_eq!(message, "bad credential"),
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[tokio::test]
async fn client_built_from_env_routes_roles_to_providers() {
    let env: EnvSnapshot = [
        ("DEEPSEEK_API_KEY", "sk-test"),
        ("SHINKAI_PLANNER_MODEL", "deepseek-reasoner"),
    ]
    .into_iter()
    .collect();
    let transport = Arc::new(CannedTransport::new(200, COMPLETION_BODY));
    let client = build_client(&env, transport.clone()).expect("client");

    let response = client
        .chat(ModelRole::Planner, greeting_request())
        .await
        .expect("planner chat");
    assert_eq!(response.message.content, "Hello from the mock.");

    let body: serde_json::Value =
        serde_json::from_slice(&transport.seen_request().seen_body()).expect("body is JSON");
    assert_eq!(body["model"], serde_json::json!("deepseek-reasoner"));
}

/// Helper extending [`HttpRequest`] with body access for assertions.
trait SeenBody {
    fn seen_body(&self) -> Vec<u8>;
}

impl SeenBody for HttpRequest {
    fn seen_body(&self) -> Vec<u8> {
        self.body.clone().expect("request should carry a body")
    }
}
