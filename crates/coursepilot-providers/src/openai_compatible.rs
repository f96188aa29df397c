//! Unified OpenAI-compatible provider.
//!
//! A single struct that handles chat completions for every supported
//! backend. Providers are distinguished only by endpoint URL, auth
//! style, and API key.

use async_trait::async_trait;
use serde_json::{Value, json};

use coursepilot_core::config::CoursePilotConfig;
use coursepilot_core::error::{CoursePilotError, Result};
use coursepilot_core::traits::provider::{GenerateParams, Provider};
use coursepilot_core::types::{
    FunctionCall, Message, ProviderResponse, ToolCall, ToolDefinition, Usage,
};

use crate::provider_registry::{AuthStyle, ProviderConfig};

/// A provider that works with any OpenAI-compatible API.
pub struct OpenAiCompatibleProvider {
    name: String,
    api_key: String,
    base_url: String,
    chat_path: String,
    auth_style: AuthStyle,
    client: reqwest::Client,
}

impl OpenAiCompatibleProvider {
    /// Create from a registry entry.
    ///
    /// API key resolution: `config.api_key` > env vars > empty.
    /// Base URL resolution: env override > registry default.
    pub fn from_registry(registry: &ProviderConfig, config: &CoursePilotConfig) -> Self {
        let api_key = if !config.api_key.is_empty() {
            config.api_key.clone()
        } else {
            registry
                .env_keys
                .iter()
                .find_map(|key| std::env::var(key).ok())
                .unwrap_or_default()
        };

        let base_url = registry
            .base_url_env
            .and_then(|env_key| {
                let val = std::env::var(env_key).ok()?;
                // OLLAMA_HOST style values omit the /v1 suffix
                if val.ends_with("/v1") {
                    Some(val)
                } else {
                    Some(format!("{}/v1", val.trim_end_matches('/')))
                }
            })
            .unwrap_or_else(|| registry.base_url.to_string());

        Self {
            name: registry.name.to_string(),
            api_key,
            base_url,
            chat_path: registry.chat_path.to_string(),
            auth_style: registry.auth_style,
            client: reqwest::Client::new(),
        }
    }

    /// Create for a custom endpoint ("custom:https://my-server.com/v1").
    pub fn custom(endpoint: &str, config: &CoursePilotConfig) -> Self {
        let base_url = endpoint
            .strip_prefix("custom:")
            .unwrap_or(endpoint)
            .trim_end_matches('/')
            .to_string();

        let api_key = if !config.api_key.is_empty() {
            config.api_key.clone()
        } else {
            std::env::var("CUSTOM_API_KEY").unwrap_or_default()
        };

        let auth_style = if api_key.is_empty() {
            AuthStyle::None
        } else {
            AuthStyle::Bearer
        };

        Self {
            name: "custom".to_string(),
            api_key,
            base_url,
            chat_path: "/chat/completions".to_string(),
            auth_style,
            client: reqwest::Client::new(),
        }
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_style {
            AuthStyle::Bearer if !self.api_key.is_empty() => {
                req.header("Authorization", format!("Bearer {}", self.api_key))
            }
            _ => req,
        }
    }
}

#[async_trait]
impl Provider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        params: &GenerateParams,
    ) -> Result<ProviderResponse> {
        if self.auth_style != AuthStyle::None && self.api_key.is_empty() {
            return Err(CoursePilotError::ApiKeyMissing(self.name.clone()));
        }

        let mut body = json!({
            "model": params.model,
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
            "messages": serde_json::to_value(messages)?,
        });

        if !tools.is_empty() {
            let tool_defs: Vec<Value> = tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        }
                    })
                })
                .collect();
            body["tools"] = Value::Array(tool_defs);
        }

        let url = format!("{}{}", self.base_url, self.chat_path);
        let req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        let req = self.apply_auth(req);

        let resp = req.send().await.map_err(|e| {
            CoursePilotError::Http(format!("{} connection failed ({}): {}", self.name, url, e))
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(CoursePilotError::Provider(format!(
                "{} API error {}: {}",
                self.name, status, text
            )));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| CoursePilotError::Http(e.to_string()))?;

        let choice = json["choices"]
            .get(0)
            .ok_or_else(|| CoursePilotError::Provider("No choices in response".into()))?;

        let content = choice["message"]["content"].as_str().map(String::from);

        let tool_calls = if let Some(tc) = choice["message"]["tool_calls"].as_array() {
            tc.iter()
                .filter_map(|t| {
                    Some(ToolCall {
                        id: t["id"].as_str().unwrap_or("").to_string(),
                        r#type: "function".to_string(),
                        function: FunctionCall {
                            name: t["function"]["name"].as_str()?.to_string(),
                            arguments: t["function"]["arguments"].as_str()?.to_string(),
                        },
                    })
                })
                .collect()
        } else {
            vec![]
        };

        let usage = json["usage"].as_object().map(|u| Usage {
            prompt_tokens: u.get("prompt_tokens").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
            completion_tokens: u
                .get("completion_tokens")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32,
            total_tokens: u.get("total_tokens").and_then(|v| v.as_u64()).unwrap_or(0) as u32,
        });

        Ok(ProviderResponse {
            content,
            tool_calls,
            finish_reason: choice["finish_reason"].as_str().map(String::from),
            usage,
        })
    }
}
