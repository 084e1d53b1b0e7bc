//! DeepSeek chat-completion provider speaking the OpenAI dialect.

mod error;
mod provider;
mod request;
mod response;
mod stream;
mod types;

pub use provider::{
    DEEPSEEK_DEFAULT_MODEL, DEEPSEEK_DEFAULT_PLANNER_MODEL, DEEPSEEK_DOC_URL,
    DEEPSEEK_KNOWN_MODELS, DeepSeekProvider,
};
