//! LLM provider trait.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Message, ProviderResponse, ToolDefinition};

/// Sampling parameters for one generation request.
#[derive(Debug, Clone)]
pub struct GenerateParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A chat-completions backend. Implementations own their HTTP client
/// and credentials; callers see only messages in, response out.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    /// One request/response exchange. `tools` may be empty, which tells
    /// the model it must answer in text.
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        params: &GenerateParams,
    ) -> Result<ProviderResponse>;
}
