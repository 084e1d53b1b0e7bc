//! DeepSeek chat-completion client with environment-driven role configuration.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod provider;
pub mod stream;
pub mod types;

pub use client::ChatClient;
pub use config::{EnvSnapshot, ModelRole, ProviderConfig, build_client, resolve};
pub use error::{ClientError, ConfigError};
pub use provider::{ChatProvider, ChatStream};
pub use types::*;
