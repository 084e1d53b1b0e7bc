//! Environment-driven provider configuration, resolved once per model role.
//!
//! Resolution is a pure function of an [`EnvSnapshot`] captured at startup;
//! request logic never reads the ambient environment.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::ChatClient;
use crate::error::ConfigError;
use crate::http::DynHttpTransport;
use crate::provider::DynProvider;
use crate::provider::deepseek::{
    DEEPSEEK_DEFAULT_MODEL, DEEPSEEK_DEFAULT_PLANNER_MODEL, DeepSeekProvider,
};

const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Logical model roles, each independently configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelRole {
    /// Primary task execution.
    Lead,
    /// Dedicated planning command.
    Planner,
}

impl ModelRole {
    pub const ALL: [ModelRole; 2] = [ModelRole::Lead, ModelRole::Planner];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelRole::Lead => "lead",
            ModelRole::Planner => "planner",
        }
    }

    fn model_var(self) -> &'static str {
        match self {
            ModelRole::Lead => "SHINKAI_LEAD_MODEL",
            ModelRole::Planner => "SHINKAI_PLANNER_MODEL",
        }
    }

    fn provider_var(self) -> &'static str {
        match self {
            ModelRole::Lead => "SHINKAI_LEAD_PROVIDER",
            ModelRole::Planner => "SHINKAI_PLANNER_PROVIDER",
        }
    }

    fn default_deepseek_model(self) -> &'static str {
        match self {
            ModelRole::Lead => DEEPSEEK_DEFAULT_MODEL,
            ModelRole::Planner => DEEPSEEK_DEFAULT_PLANNER_MODEL,
        }
    }
}

impl fmt::Display for ModelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of environment variables.
///
/// Captured once at process start; blank values are treated as unset so an
/// exported-but-empty variable behaves like a missing one.
///
/// # Examples
///
/// ```
/// use shinkai_llm::config::EnvSnapshot;
///
/// let env: EnvSnapshot = [("DEEPSEEK_API_KEY", "sk-test")].into_iter().collect();
/// assert_eq!(env.get("DEEPSEEK_API_KEY"), Some("sk-test"));
/// assert_eq!(env.get("DEEPSEEK_HOST"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Captures the current process environment.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Looks up a variable, treating blank values as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Provider backends selectable per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    DeepSeek,
}

impl ProviderKind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "deepseek" => Some(ProviderKind::DeepSeek),
            _ => None,
        }
    }
}

/// Immutable description of how to reach a completion endpoint.
///
/// Constructed once per resolved role via [`resolve`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Backend the configuration targets.
    pub provider: ProviderKind,
    /// Bearer credential; guaranteed non-empty by resolution.
    pub api_key: String,
    /// Base URL of the endpoint.
    pub host: String,
    /// Request path suffix appended to the host.
    pub base_path: String,
    /// Per-request deadline.
    pub timeout: Duration,
    /// Model identifier selected for the role.
    pub model: String,
    /// Extra headers stamped onto every request.
    pub custom_headers: Option<HashMap<String, String>>,
}

/// Resolves the configuration for one role from an environment snapshot.
///
/// Role-specific variables win over the generic ones, which win over the
/// provider defaults. No side effects beyond reading the snapshot.
///
/// # Errors
///
/// - [`ConfigError::MissingApiKey`] when `DEEPSEEK_API_KEY` is absent or empty.
/// - [`ConfigError::InvalidTimeout`] when `DEEPSEEK_TIMEOUT` is not a positive
///   integer.
/// - [`ConfigError::UnknownProvider`] when a selector names an unimplemented
///   backend.
pub fn resolve(role: ModelRole, env: &EnvSnapshot) -> Result<ProviderConfig, ConfigError> {
    match selected_provider(role, env)? {
        ProviderKind::DeepSeek => resolve_deepseek(role, env),
    }
}

/// Resolves both roles and assembles a [`ChatClient`] over the given transport.
///
/// # Errors
///
/// Forwards the first [`ConfigError`] raised by per-role resolution.
pub fn build_client(
    env: &EnvSnapshot,
    transport: DynHttpTransport,
) -> Result<ChatClient, ConfigError> {
    let mut builder = ChatClient::builder();
    for role in ModelRole::ALL {
        let config = resolve(role, env)?;
        let provider: DynProvider = match config.provider {
            ProviderKind::DeepSeek => Arc::new(DeepSeekProvider::new(transport.clone(), config)),
        };
        builder = builder.register_role(role, provider);
    }
    Ok(builder.build())
}

fn selected_provider(role: ModelRole, env: &EnvSnapshot) -> Result<ProviderKind, ConfigError> {
    let selector = env
        .get(role.provider_var())
        .or_else(|| env.get("SHINKAI_PROVIDER"));
    match selector {
        None => Ok(ProviderKind::DeepSeek),
        Some(name) => {
            ProviderKind::from_name(name).ok_or_else(|| ConfigError::UnknownProvider {
                name: name.to_string(),
            })
        }
    }
}

fn resolve_deepseek(role: ModelRole, env: &EnvSnapshot) -> Result<ProviderConfig, ConfigError> {
    let api_key = env
        .get("DEEPSEEK_API_KEY")
        .ok_or(ConfigError::MissingApiKey)?
        .to_string();
    let host = env
        .get("DEEPSEEK_HOST")
        .unwrap_or("https://api.deepseek.com")
        .to_string();
    let base_path = env
        .get("DEEPSEEK_BASE_PATH")
        .unwrap_or("v1/chat/completions")
        .to_string();
    let timeout = parse_timeout(env.get("DEEPSEEK_TIMEOUT"))?;
    let custom_headers = env.get("DEEPSEEK_CUSTOM_HEADERS").map(parse_custom_headers);
    let model = env
        .get(role.model_var())
        .or_else(|| env.get("SHINKAI_MODEL"))
        .unwrap_or(role.default_deepseek_model())
        .to_string();

    Ok(ProviderConfig {
        provider: ProviderKind::DeepSeek,
        api_key,
        host,
        base_path,
        timeout,
        model,
        custom_headers,
    })
}

fn parse_timeout(value: Option<&str>) -> Result<Duration, ConfigError> {
    match value {
        None => Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(seconds) if seconds > 0 => Ok(Duration::from_secs(seconds)),
            _ => Err(ConfigError::InvalidTimeout {
                value: raw.to_string(),
            }),
        },
    }
}

/// Parses the `K=V,K2=V2` custom-header format.
fn parse_custom_headers(raw: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    for pair in raw.split(',') {
        if let Some((key, value)) = pair.split_once('=') {
            headers.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    headers
}
