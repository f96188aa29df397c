//! Course content search tool — semantic search with optional filters.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use coursepilot_core::error::Result;
use coursepilot_core::traits::Tool;
use coursepilot_core::types::ToolDefinition;
use coursepilot_store::VectorStore;

/// Searches course content chunks and records which courses/lessons
/// the returned material came from, so the caller can surface sources
/// alongside the final answer.
pub struct SearchTool {
    store: Arc<VectorStore>,
    sources: Mutex<Vec<String>>,
}

impl SearchTool {
    pub fn new(store: Arc<VectorStore>) -> Self {
        Self {
            store,
            sources: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "search_course_content"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "search_course_content".into(),
            description: "Search course materials with smart course name matching and lesson filtering".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to search for in the course content"
                    },
                    "course_name": {
                        "type": "string",
                        "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                    },
                    "lesson_number": {
                        "type": "integer",
                        "description": "Specific lesson number to search within (e.g. 1, 2, 3)"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: serde_json::Value = serde_json::from_str(arguments)
            .unwrap_or_else(|_| serde_json::json!({ "query": arguments }));

        let query = args["query"].as_str().unwrap_or(arguments);
        let course_name = args["course_name"].as_str();
        let lesson_number = args["lesson_number"].as_u64().map(|n| n as u32);

        tracing::debug!(
            "search_course_content: query='{}' course={:?} lesson={:?}",
            query,
            course_name,
            lesson_number
        );

        let results = self.store.search(query, course_name, lesson_number).await?;

        if let Some(error) = results.error {
            return Ok(error);
        }

        if results.is_empty() {
            let mut scope = String::new();
            if let Some(name) = course_name {
                scope.push_str(&format!(" in course '{name}'"));
            }
            if let Some(n) = lesson_number {
                scope.push_str(&format!(" in lesson {n}"));
            }
            return Ok(format!("No relevant content found{scope}."));
        }

        let mut blocks = Vec::with_capacity(results.documents.len());
        let mut sources = self.sources.lock().unwrap_or_else(|e| e.into_inner());
        for (doc, meta) in results.documents.iter().zip(&results.metadata) {
            let header = match meta.lesson_number {
                Some(n) => format!("{} - Lesson {}", meta.course_title, n),
                None => meta.course_title.clone(),
            };
            blocks.push(format!("[{header}]\n{doc}"));

            // Source label carries the lesson link when the catalog
            // knows one.
            let label = match meta
                .lesson_number
                .and_then(|n| self.store.get_lesson_link(&meta.course_title, n))
            {
                Some(link) => format!("{header} ({link})"),
                None => header,
            };
            if !sources.contains(&label) {
                sources.push(label);
            }
        }

        Ok(blocks.join("\n\n"))
    }

    fn take_sources(&self) -> Vec<String> {
        let mut sources = self.sources.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *sources)
    }
}
