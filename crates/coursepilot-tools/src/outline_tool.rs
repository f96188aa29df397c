//! Course outline tool — title, link, and lesson list for one course.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use coursepilot_core::error::Result;
use coursepilot_core::traits::Tool;
use coursepilot_core::types::ToolDefinition;
use coursepilot_store::VectorStore;

pub struct OutlineTool {
    store: Arc<VectorStore>,
    sources: Mutex<Vec<String>>,
}

impl OutlineTool {
    pub fn new(store: Arc<VectorStore>) -> Self {
        Self {
            store,
            sources: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Tool for OutlineTool {
    fn name(&self) -> &str {
        "get_course_outline"
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_course_outline".into(),
            description: "Get the full outline of a course: title, link, and all lessons".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "course_title": {
                        "type": "string",
                        "description": "Course title (partial matches work, e.g. 'MCP', 'Introduction')"
                    }
                },
                "required": ["course_title"]
            }),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<String> {
        let args: serde_json::Value = serde_json::from_str(arguments)
            .unwrap_or_else(|_| serde_json::json!({ "course_title": arguments }));
        let requested = args["course_title"].as_str().unwrap_or(arguments);

        let Some(title) = self.store.resolve_course_name(requested).await? else {
            return Ok(format!("No course found matching '{requested}'"));
        };
        let Some(course) = self.store.get_course_outline(&title)? else {
            return Ok(format!("No course found matching '{requested}'"));
        };

        {
            let mut sources = self.sources.lock().unwrap_or_else(|e| e.into_inner());
            if !sources.contains(&course.title) {
                sources.push(course.title.clone());
            }
        }

        let mut out = format!("Course: {}", course.title);
        if let Some(link) = &course.course_link {
            out.push_str(&format!("\nCourse link: {link}"));
        }
        if let Some(instructor) = &course.instructor {
            out.push_str(&format!("\nInstructor: {instructor}"));
        }
        out.push_str(&format!("\n\nLessons ({}):", course.lessons.len()));
        for lesson in &course.lessons {
            out.push_str(&format!("\n  {}. {}", lesson.lesson_number, lesson.title));
        }
        Ok(out)
    }

    fn take_sources(&self) -> Vec<String> {
        let mut sources = self.sources.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursepilot_core::config::StoreConfig;
    use coursepilot_core::types::{Course, Lesson};
    use coursepilot_store::HashEmbedder;

    async fn seeded_store() -> Arc<VectorStore> {
        let config = StoreConfig::default();
        let store = VectorStore::in_memory(Box::new(HashEmbedder::new(384)), &config).unwrap();
        store
            .add_course_metadata(&Course {
                title: "Introduction to Machine Learning".into(),
                course_link: Some("https://example.com/ml".into()),
                instructor: Some("Dr. Jane Smith".into()),
                lessons: vec![
                    Lesson {
                        lesson_number: 0,
                        title: "Welcome".into(),
                        lesson_link: None,
                    },
                    Lesson {
                        lesson_number: 1,
                        title: "Supervised Learning".into(),
                        lesson_link: None,
                    },
                ],
            })
            .await
            .unwrap();
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_outline_renders_course_and_lessons() {
        let tool = OutlineTool::new(seeded_store().await);
        let output = tool
            .execute(r#"{"course_title": "Machine Learning"}"#)
            .await
            .unwrap();
        assert!(output.starts_with("Course: Introduction to Machine Learning"));
        assert!(output.contains("Course link: https://example.com/ml"));
        assert!(output.contains("Instructor: Dr. Jane Smith"));
        assert!(output.contains("Lessons (2):"));
        assert!(output.contains("0. Welcome"));
        assert!(output.contains("1. Supervised Learning"));
    }

    #[tokio::test]
    async fn test_outline_resolves_partial_title() {
        let tool = OutlineTool::new(seeded_store().await);
        let output = tool.execute(r#"{"course_title": "Intro"}"#).await.unwrap();
        assert!(output.contains("Introduction to Machine Learning"));
    }

    #[tokio::test]
    async fn test_outline_records_course_as_source() {
        let tool = OutlineTool::new(seeded_store().await);
        tool.execute(r#"{"course_title": "Intro"}"#).await.unwrap();
        assert_eq!(tool.take_sources(), vec!["Introduction to Machine Learning"]);
        assert!(tool.take_sources().is_empty());
    }

    #[tokio::test]
    async fn test_outline_unknown_course() {
        let tool = OutlineTool::new(seeded_store().await);
        let output = tool
            .execute(r#"{"course_title": "Quantum Basket Weaving"}"#)
            .await
            .unwrap();
        assert_eq!(output, "No course found matching 'Quantum Basket Weaving'");
    }
}
