//! Tool manager — registry and name-based dispatch.

use std::collections::HashMap;

use coursepilot_core::error::{CoursePilotError, Result};
use coursepilot_core::traits::Tool;
use coursepilot_core::types::ToolDefinition;

/// Owns the registered tools and dispatches model tool calls by name.
#[derive(Default)]
pub struct ToolManager {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own declared name. A later
    /// registration with the same name replaces the earlier one.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Schemas of all registered tools, for the provider request.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Execute one tool call. An unknown name is an error the caller
    /// can relay back to the model as text.
    pub async fn execute(&self, name: &str, arguments: &str) -> Result<String> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| CoursePilotError::ToolNotFound(name.to_string()))?;
        tool.execute(arguments).await
    }

    /// Drain the sources recorded by all tools since the last call.
    pub fn last_sources(&self) -> Vec<String> {
        let mut sources = Vec::new();
        for tool in self.tools.values() {
            sources.extend(tool.take_sources());
        }
        sources
    }
}
