//! LLM provider implementations.
//!
//! All supported backends speak the OpenAI chat-completions dialect
//! (Anthropic included, via its compatibility endpoint), so a single
//! `OpenAiCompatibleProvider` covers every one of them. Providers are
//! distinguished only by endpoint URL, auth style, and API key.

pub mod openai_compatible;
pub mod provider_registry;

use coursepilot_core::config::CoursePilotConfig;
use coursepilot_core::error::{CoursePilotError, Result};
use coursepilot_core::traits::Provider;

/// Create a provider from configuration.
pub fn create_provider(config: &CoursePilotConfig) -> Result<Box<dyn Provider>> {
    match config.provider.as_str() {
        // Custom endpoint: "custom:https://my-server.com/v1"
        other if other.starts_with("custom:") => Ok(Box::new(
            openai_compatible::OpenAiCompatibleProvider::custom(other, config),
        )),

        name => {
            let registry = provider_registry::get_provider_config(name)
                .ok_or_else(|| CoursePilotError::ProviderNotFound(name.into()))?;
            Ok(Box::new(
                openai_compatible::OpenAiCompatibleProvider::from_registry(registry, config),
            ))
        }
    }
}

/// List all available provider names.
pub fn available_providers() -> Vec<&'static str> {
    let mut names = provider_registry::all_provider_names();
    names.push("custom");
    names
}
