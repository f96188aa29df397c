//! CoursePilot error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoursePilotError>;

#[derive(Error, Debug)]
pub enum CoursePilotError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Ingest error: {0}")]
    Ingest(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("API key missing for provider '{0}'")]
    ApiKeyMissing(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_not_found_display() {
        let err = CoursePilotError::ToolNotFound("bogus_tool".into());
        assert_eq!(err.to_string(), "Tool not found: bogus_tool");
    }

    #[test]
    fn test_io_error_converts() {
        fn read_missing() -> Result<String> {
            Ok(std::fs::read_to_string("/nonexistent/coursepilot")?)
        }
        assert!(matches!(read_missing(), Err(CoursePilotError::Io(_))));
    }
}
