//! CoursePilot configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoursePilotConfig {
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_api_key() -> String { String::new() }
fn default_provider() -> String { "anthropic".into() }
fn default_model() -> String { "claude-sonnet-4-0".into() }
fn default_temperature() -> f32 { 0.0 }
fn default_max_tokens() -> u32 { 800 }

impl Default for CoursePilotConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            ingest: IngestConfig::default(),
            store: StoreConfig::default(),
            agent: AgentConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl CoursePilotConfig {
    /// Load config from the default path (~/.coursepilot/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::CoursePilotError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| crate::error::CoursePilotError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::CoursePilotError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".coursepilot")
            .join("config.toml")
    }

    /// Get the CoursePilot home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".coursepilot")
    }
}

/// Document ingestion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Character length of each content chunk window.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Characters of overlap between consecutive windows.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    /// Directory of course documents loaded at startup.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,
}

fn default_chunk_size() -> usize { 800 }
fn default_chunk_overlap() -> usize { 100 }
fn default_docs_dir() -> String { "docs".into() }

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            docs_dir: default_docs_dir(),
        }
    }
}

/// Vector store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database holding both collections.
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// Maximum results per content search.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Minimum cosine similarity for fuzzy course-name resolution.
    #[serde(default = "default_resolve_threshold")]
    pub resolve_threshold: f32,
    /// Embedding backend: "hash" (local, deterministic) or "openai"
    /// (any OpenAI-compatible /embeddings endpoint).
    #[serde(default = "default_embedding_provider")]
    pub embedding_provider: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    /// Base URL override for the embeddings API.
    #[serde(default)]
    pub embedding_endpoint: String,
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,
}

fn default_db_path() -> String { "~/.coursepilot/store.db".into() }
fn default_max_results() -> usize { 5 }
fn default_resolve_threshold() -> f32 { 0.2 }
fn default_embedding_provider() -> String { "hash".into() }
fn default_embedding_model() -> String { "text-embedding-3-small".into() }
fn default_embedding_dim() -> usize { 384 }

impl StoreConfig {
    /// The database path with `~` expanded to the home directory.
    pub fn resolved_db_path(&self) -> PathBuf {
        if let Some(rest) = self.db_path.strip_prefix("~/") {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(rest)
        } else {
            PathBuf::from(&self.db_path)
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            max_results: default_max_results(),
            resolve_threshold: default_resolve_threshold(),
            embedding_provider: default_embedding_provider(),
            embedding_model: default_embedding_model(),
            embedding_endpoint: String::new(),
            embedding_dim: default_embedding_dim(),
        }
    }
}

/// Agent loop and session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Exchanges (user + assistant pairs) retained per session.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    /// Tool rounds allowed per query before the model must answer.
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,
}

fn default_max_history() -> usize { 2 }
fn default_max_tool_rounds() -> usize { 2 }

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
            max_tool_rounds: default_max_tool_rounds(),
        }
    }
}

/// Gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 { 8000 }
fn default_host() -> String { "127.0.0.1".into() }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}
