use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub(crate) struct DeepSeekChatResponse {
    #[serde(default)]
    pub(crate) id: Option<String>,
    #[serde(default)]
    pub(crate) model: Option<String>,
    #[serde(default)]
    pub(crate) choices: Vec<DeepSeekChoice>,
    #[serde(default)]
    pub(crate) usage: Option<DeepSeekUsage>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub(crate) struct DeepSeekChoice {
    #[serde(default)]
    pub(crate) index: usize,
    #[serde(default)]
    pub(crate) message: Option<DeepSeekMessage>,
    #[serde(default)]
    pub(crate) finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub(crate) struct DeepSeekMessage {
    #[serde(default)]
    pub(crate) role: Option<String>,
    #[serde(default)]
    pub(crate) content: Option<String>,
    /// Reasoning trace emitted by `deepseek-reasoner` ahead of the answer.
    #[serde(default)]
    pub(crate) reasoning_content: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub(crate) struct DeepSeekUsage {
    #[serde(default)]
    pub(crate) prompt_tokens: Option<u64>,
    #[serde(default)]
    pub(crate) completion_tokens: Option<u64>,
    #[serde(default)]
    pub(crate) total_tokens: Option<u64>,
    #[serde(default)]
    pub(crate) prompt_cache_hit_tokens: Option<u64>,
    #[serde(default)]
    pub(crate) completion_tokens_details: Option<DeepSeekCompletionTokensDetails>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub(crate) struct DeepSeekCompletionTokensDetails {
    #[serde(default)]
    pub(crate) reasoning_tokens: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub(crate) struct DeepSeekStreamChunk {
    #[serde(default)]
    pub(crate) choices: Vec<DeepSeekStreamChoice>,
    #[serde(default)]
    pub(crate) usage: Option<DeepSeekUsage>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub(crate) struct DeepSeekStreamChoice {
    #[serde(default)]
    pub(crate) index: usize,
    #[serde(default)]
    pub(crate) delta: Option<DeepSeekDelta>,
    #[serde(default)]
    pub(crate) finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub(crate) struct DeepSeekDelta {
    #[serde(default)]
    pub(crate) role: Option<String>,
    #[serde(default)]
    pub(crate) content: Option<String>,
    #[serde(default)]
    pub(crate) reasoning_content: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct DeepSeekModelList {
    #[serde(default)]
    pub(crate) data: Vec<DeepSeekModelEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct DeepSeekModelEntry {
    pub(crate) id: String,
}
