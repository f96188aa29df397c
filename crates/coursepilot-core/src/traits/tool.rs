//! Tool trait — capabilities the model can invoke by name.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ToolDefinition;

/// A callable capability with a declared schema.
///
/// Tools are dispatched behind `&self` from concurrent request handlers,
/// so implementations that track state (e.g. sources used by the last
/// search) do it with interior mutability.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn definition(&self) -> ToolDefinition;

    /// Execute with the raw JSON arguments string from the model and
    /// return a human-readable text block.
    async fn execute(&self, arguments: &str) -> Result<String>;

    /// Drain the source labels recorded by executions since the last
    /// call. Default: the tool tracks no sources.
    fn take_sources(&self) -> Vec<String> {
        Vec::new()
    }
}
