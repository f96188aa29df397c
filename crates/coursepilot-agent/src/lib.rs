//! # CoursePilot Agent
//!
//! The retrieval-augmented answering engine. Wires together the
//! document processor, vector store, tool registry, provider, and
//! session memory behind one `RagSystem` facade:
//!
//! ```text
//! docs ──▶ processor ──▶ vector store ◀── tools ◀── generator ◀── query
//!                                                      │
//!                                              session history
//! ```

pub mod generator;
pub mod session;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use coursepilot_core::config::CoursePilotConfig;
use coursepilot_core::error::Result;
use coursepilot_core::traits::Provider;
use coursepilot_core::traits::provider::GenerateParams;
use coursepilot_ingest::DocumentProcessor;
use coursepilot_providers::create_provider;
use coursepilot_store::{VectorStore, create_embedder};
use coursepilot_tools::{OutlineTool, SearchTool, ToolManager};

use generator::AiGenerator;
use session::SessionManager;

/// Answer to one query, with the sources the tools consulted.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub answer: String,
    pub sources: Vec<String>,
    pub session_id: String,
}

/// Catalog statistics for the analytics endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CourseAnalytics {
    pub total_courses: usize,
    pub course_titles: Vec<String>,
}

/// The assembled RAG pipeline.
pub struct RagSystem {
    store: Arc<VectorStore>,
    processor: DocumentProcessor,
    generator: AiGenerator,
    tools: ToolManager,
    sessions: SessionManager,
}

impl RagSystem {
    /// Build the full system from config: persistent store on disk,
    /// provider chosen by name.
    pub fn new(config: &CoursePilotConfig) -> Result<Self> {
        let embedder = create_embedder(&config.store)?;
        let store = Arc::new(VectorStore::open(
            &config.store.resolved_db_path(),
            embedder,
            &config.store,
        )?);
        let provider = create_provider(config)?;
        Ok(Self::assemble(config, provider, store))
    }

    /// Build with an explicit provider and an in-memory store. Used by
    /// tests and one-off sessions that should not touch disk.
    pub fn with_provider(
        config: &CoursePilotConfig,
        provider: Box<dyn Provider>,
    ) -> Result<Self> {
        let embedder = create_embedder(&config.store)?;
        let store = Arc::new(VectorStore::in_memory(embedder, &config.store)?);
        Ok(Self::assemble(config, provider, store))
    }

    fn assemble(
        config: &CoursePilotConfig,
        provider: Box<dyn Provider>,
        store: Arc<VectorStore>,
    ) -> Self {
        let mut tools = ToolManager::new();
        tools.register(Box::new(SearchTool::new(store.clone())));
        tools.register(Box::new(OutlineTool::new(store.clone())));

        let params = GenerateParams {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };
        let generator = AiGenerator::new(provider, params, config.agent.max_tool_rounds);

        Self {
            store,
            processor: DocumentProcessor::new(
                config.ingest.chunk_size,
                config.ingest.chunk_overlap,
            ),
            generator,
            tools,
            sessions: SessionManager::new(config.agent.max_history),
        }
    }

    /// Ingest a single course document. Returns the course title, the
    /// number of chunks stored, and whether the course was newly added
    /// (false when a course with the same title already exists).
    pub async fn add_course_document(&self, path: &Path) -> Result<(String, usize, bool)> {
        let (course, chunks) = self.processor.process_file(path)?;
        let inserted = self.store.add_course_metadata(&course).await?;
        if !inserted {
            return Ok((course.title, 0, false));
        }
        let count = self.store.add_course_content(&chunks).await?;
        tracing::info!("Added course '{}' ({} chunks)", course.title, count);
        Ok((course.title, count, true))
    }

    /// Ingest every .txt/.md document in a folder, skipping courses
    /// whose titles are already stored. A document that fails to parse
    /// is logged and skipped, the rest of the folder still loads.
    /// Returns (courses added, chunks added).
    pub async fn add_course_folder(&self, dir: &Path) -> Result<(usize, usize)> {
        let mut entries: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("txt") | Some("md")
                )
            })
            .collect();
        entries.sort();

        let mut courses_added = 0;
        let mut chunks_added = 0;
        for path in entries {
            match self.add_course_document(&path).await {
                Ok((_, _, false)) => {}
                Ok((_, count, true)) => {
                    courses_added += 1;
                    chunks_added += count;
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                }
            }
        }
        Ok((courses_added, chunks_added))
    }

    /// Answer one query. A missing session id starts a new session;
    /// the returned id lets the caller continue the conversation.
    pub async fn query(&self, text: &str, session_id: Option<&str>) -> Result<QueryOutcome> {
        let session_id = match session_id {
            Some(id) => id.to_string(),
            None => self.sessions.create_session(),
        };
        let history = self.sessions.history(&session_id);

        // A failed generation can leave sources behind in the tools.
        // Discard them so they cannot surface on this query.
        self.tools.last_sources();

        let prompt = format!("Answer this question about course materials: {text}");
        let answer = self
            .generator
            .generate(&prompt, history.as_deref(), &self.tools)
            .await?;

        let sources = self.tools.last_sources();
        self.sessions.add_exchange(&session_id, text, &answer);

        Ok(QueryOutcome {
            answer,
            sources,
            session_id,
        })
    }

    pub fn course_analytics(&self) -> Result<CourseAnalytics> {
        let course_titles = self.store.existing_course_titles()?;
        Ok(CourseAnalytics {
            total_courses: course_titles.len(),
            course_titles,
        })
    }
}
