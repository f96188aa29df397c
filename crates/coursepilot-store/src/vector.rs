//! Two-collection vector store over SQLite.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

use coursepilot_core::config::StoreConfig;
use coursepilot_core::error::{CoursePilotError, Result};
use coursepilot_core::traits::Embedder;
use coursepilot_core::types::{ChunkMetadata, Course, CourseChunk, Lesson, SearchResults};

use crate::embedder::cosine_similarity;

/// Vector store holding the course catalog and content chunks.
///
/// Embeddings are computed before taking the connection lock, so the
/// blocking SQLite section stays short. Nearest-neighbor ranking is a
/// brute-force cosine scan — the corpus is a few thousand chunks, not
/// millions.
pub struct VectorStore {
    conn: Mutex<Connection>,
    embedder: Box<dyn Embedder>,
    max_results: usize,
    resolve_threshold: f32,
}

impl VectorStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: &Path, embedder: Box<dyn Embedder>, config: &StoreConfig) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .map_err(|e| CoursePilotError::Store(e.to_string()))?;
        Self::init(conn, embedder, config)
    }

    /// In-memory store, used by tests and throwaway sessions.
    pub fn in_memory(embedder: Box<dyn Embedder>, config: &StoreConfig) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoursePilotError::Store(e.to_string()))?;
        Self::init(conn, embedder, config)
    }

    fn init(conn: Connection, embedder: Box<dyn Embedder>, config: &StoreConfig) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS course_catalog (
                title TEXT PRIMARY KEY,
                course_link TEXT,
                instructor TEXT,
                lessons_json TEXT NOT NULL,
                embedding BLOB NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS course_content (
                id TEXT PRIMARY KEY,
                course_title TEXT NOT NULL,
                lesson_number INTEGER,
                chunk_index INTEGER NOT NULL,
                content TEXT NOT NULL,
                embedding BLOB NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_content_course
                ON course_content (course_title, lesson_number);",
        )
        .map_err(|e| CoursePilotError::Store(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
            embedder,
            max_results: config.max_results,
            resolve_threshold: config.resolve_threshold,
        })
    }

    // ── Catalog collection ─────────────────────────────────

    /// Add a course to the catalog. Idempotent: a title already present
    /// (from this run or any prior one — the check hits the persisted
    /// table) is silently skipped. Returns whether a row was inserted.
    pub async fn add_course_metadata(&self, course: &Course) -> Result<bool> {
        {
            let conn = self.lock_conn()?;
            let exists: bool = conn
                .query_row(
                    "SELECT 1 FROM course_catalog WHERE title = ?1",
                    rusqlite::params![course.title],
                    |_| Ok(true),
                )
                .unwrap_or(false);
            if exists {
                tracing::info!("Course '{}' already in catalog, skipping", course.title);
                return Ok(false);
            }
        }

        let embedding = self.embed_one(&course.title).await?;
        let lessons_json = serde_json::to_string(&course.lessons)?;

        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO course_catalog
                 (title, course_link, instructor, lessons_json, embedding, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                course.title,
                course.course_link,
                course.instructor,
                lessons_json,
                embedding_to_blob(&embedding),
                chrono::Utc::now().to_rfc3339(),
            ],
        )
        .map_err(|e| CoursePilotError::Store(e.to_string()))?;
        Ok(true)
    }

    /// Resolve a fuzzy course-name query against catalog titles.
    /// Returns the best-matching canonical title, or `None` when the
    /// catalog is empty or the best score sits below the threshold.
    pub async fn resolve_course_name(&self, query: &str) -> Result<Option<String>> {
        let query_vec = self.embed_one(query).await?;

        let conn = self.lock_conn()?;
        let mut stmt = conn
            .prepare("SELECT title, embedding FROM course_catalog")
            .map_err(|e| CoursePilotError::Store(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
            })
            .map_err(|e| CoursePilotError::Store(e.to_string()))?;

        let mut best: Option<(String, f32)> = None;
        for row in rows.flatten() {
            let (title, blob) = row;
            let score = cosine_similarity(&query_vec, &blob_to_embedding(&blob));
            if best.as_ref().is_none_or(|(_, s)| score > *s) {
                best = Some((title, score));
            }
        }

        match best {
            Some((title, score)) if score >= self.resolve_threshold => {
                tracing::debug!("Resolved '{}' → '{}' (score {:.3})", query, title, score);
                Ok(Some(title))
            }
            _ => Ok(None),
        }
    }

    /// Full course record from the catalog, for outline rendering.
    pub fn get_course_outline(&self, title: &str) -> Result<Option<Course>> {
        let conn = self.lock_conn()?;
        let row = conn
            .query_row(
                "SELECT title, course_link, instructor, lessons_json
                 FROM course_catalog WHERE title = ?1",
                rusqlite::params![title],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .ok();

        Ok(row.map(|(title, course_link, instructor, lessons_json)| {
            let lessons: Vec<Lesson> = serde_json::from_str(&lessons_json).unwrap_or_default();
            Course {
                title,
                course_link,
                instructor,
                lessons,
            }
        }))
    }

    /// Link for one lesson of a course, when the catalog knows it.
    pub fn get_lesson_link(&self, title: &str, lesson_number: u32) -> Option<String> {
        self.get_course_outline(title)
            .ok()
            .flatten()
            .and_then(|c| c.lesson(lesson_number).and_then(|l| l.lesson_link.clone()))
    }

    pub fn existing_course_titles(&self) -> Result<Vec<String>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn
            .prepare("SELECT title FROM course_catalog ORDER BY title")
            .map_err(|e| CoursePilotError::Store(e.to_string()))?;
        let titles = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| CoursePilotError::Store(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(titles)
    }

    pub fn course_count(&self) -> usize {
        let Ok(conn) = self.lock_conn() else {
            return 0;
        };
        conn.query_row("SELECT COUNT(*) FROM course_catalog", [], |r| {
            r.get::<_, i64>(0)
        })
        .unwrap_or(0) as usize
    }

    // ── Content collection ─────────────────────────────────

    /// Embed and insert content chunks. Returns the number inserted.
    pub async fn add_course_content(&self, chunks: &[CourseChunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed(&texts).await?;

        let mut conn = self.lock_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| CoursePilotError::Store(e.to_string()))?;
        for (chunk, embedding) in chunks.iter().zip(&embeddings) {
            tx.execute(
                "INSERT INTO course_content
                     (id, course_title, lesson_number, chunk_index, content, embedding)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    uuid::Uuid::new_v4().to_string(),
                    chunk.course_title,
                    chunk.lesson_number,
                    chunk.chunk_index as i64,
                    chunk.content,
                    embedding_to_blob(embedding),
                ],
            )
            .map_err(|e| CoursePilotError::Store(e.to_string()))?;
        }
        tx.commit()
            .map_err(|e| CoursePilotError::Store(e.to_string()))?;
        Ok(chunks.len())
    }

    /// Semantic search over content chunks. `course_name` is resolved
    /// fuzzily first; an unresolvable name is reported as a store-level
    /// error inside the results, not a hard failure. Empty results are
    /// a valid "no match" outcome.
    pub async fn search(
        &self,
        query: &str,
        course_name: Option<&str>,
        lesson_number: Option<u32>,
    ) -> Result<SearchResults> {
        let course_title = match course_name {
            Some(name) => match self.resolve_course_name(name).await? {
                Some(title) => Some(title),
                None => {
                    return Ok(SearchResults::error(format!(
                        "No course found matching '{name}'"
                    )));
                }
            },
            None => None,
        };

        let query_vec = self.embed_one(query).await?;

        let conn = self.lock_conn()?;
        let (sql, params): (String, Vec<Box<dyn rusqlite::ToSql>>) =
            match (&course_title, lesson_number) {
                (Some(title), Some(n)) => (
                    "SELECT content, course_title, lesson_number, chunk_index, embedding
                     FROM course_content WHERE course_title = ?1 AND lesson_number = ?2"
                        .into(),
                    vec![Box::new(title.clone()), Box::new(n)],
                ),
                (Some(title), None) => (
                    "SELECT content, course_title, lesson_number, chunk_index, embedding
                     FROM course_content WHERE course_title = ?1"
                        .into(),
                    vec![Box::new(title.clone())],
                ),
                (None, Some(n)) => (
                    "SELECT content, course_title, lesson_number, chunk_index, embedding
                     FROM course_content WHERE lesson_number = ?1"
                        .into(),
                    vec![Box::new(n)],
                ),
                (None, None) => (
                    "SELECT content, course_title, lesson_number, chunk_index, embedding
                     FROM course_content"
                        .into(),
                    vec![],
                ),
            };

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| CoursePilotError::Store(e.to_string()))?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<u32>>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, Vec<u8>>(4)?,
                ))
            })
            .map_err(|e| CoursePilotError::Store(e.to_string()))?;

        let mut scored: Vec<(f32, String, ChunkMetadata)> = rows
            .flatten()
            .map(|(content, course_title, lesson_number, chunk_index, blob)| {
                let score = cosine_similarity(&query_vec, &blob_to_embedding(&blob));
                (
                    score,
                    content,
                    ChunkMetadata {
                        course_title,
                        lesson_number,
                        chunk_index: chunk_index as usize,
                    },
                )
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.max_results);

        let mut results = SearchResults::default();
        for (score, content, metadata) in scored {
            results.documents.push(content);
            results.metadata.push(metadata);
            results.scores.push(score);
        }
        Ok(results)
    }

    /// Drop everything from both collections.
    pub fn clear_all(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute_batch("DELETE FROM course_catalog; DELETE FROM course_content;")
            .map_err(|e| CoursePilotError::Store(e.to_string()))?;
        Ok(())
    }

    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embedder.embed(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| CoursePilotError::Embedding("Embedder returned no vector".into()))
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| CoursePilotError::Store(e.to_string()))
    }
}

fn embedding_to_blob(embedding: &[f32]) -> Vec<u8> {
    let mut blob = Vec::with_capacity(embedding.len() * 4);
    for v in embedding {
        blob.extend_from_slice(&v.to_le_bytes());
    }
    blob
}

fn blob_to_embedding(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::HashEmbedder;

    fn test_store() -> VectorStore {
        let config = StoreConfig::default();
        VectorStore::in_memory(Box::new(HashEmbedder::new(384)), &config).unwrap()
    }

    fn ml_course() -> Course {
        Course {
            title: "Introduction to Machine Learning".into(),
            course_link: Some("https://example.com/ml".into()),
            instructor: Some("Dr. Jane Smith".into()),
            lessons: vec![
                Lesson {
                    lesson_number: 0,
                    title: "Welcome".into(),
                    lesson_link: Some("https://example.com/ml/lesson-0".into()),
                },
                Lesson {
                    lesson_number: 1,
                    title: "Supervised Learning".into(),
                    lesson_link: None,
                },
            ],
        }
    }

    fn ml_chunks() -> Vec<CourseChunk> {
        vec![
            CourseChunk {
                content: "Machine learning is a subset of artificial intelligence.".into(),
                course_title: "Introduction to Machine Learning".into(),
                lesson_number: Some(0),
                chunk_index: 0,
            },
            CourseChunk {
                content: "Supervised learning maps inputs to labeled outputs.".into(),
                course_title: "Introduction to Machine Learning".into(),
                lesson_number: Some(1),
                chunk_index: 1,
            },
        ]
    }

    #[tokio::test]
    async fn test_add_course_and_count() {
        let store = test_store();
        assert_eq!(store.course_count(), 0);
        assert!(store.add_course_metadata(&ml_course()).await.unwrap());
        assert_eq!(store.course_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_course_is_skipped() {
        let store = test_store();
        assert!(store.add_course_metadata(&ml_course()).await.unwrap());
        assert!(!store.add_course_metadata(&ml_course()).await.unwrap());
        assert_eq!(store.course_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_check_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let config = StoreConfig::default();
        {
            let store =
                VectorStore::open(&path, Box::new(HashEmbedder::new(384)), &config).unwrap();
            assert!(store.add_course_metadata(&ml_course()).await.unwrap());
        }
        // A second process run sees the persisted catalog.
        let store = VectorStore::open(&path, Box::new(HashEmbedder::new(384)), &config).unwrap();
        assert!(!store.add_course_metadata(&ml_course()).await.unwrap());
        assert_eq!(store.course_count(), 1);
    }

    #[tokio::test]
    async fn test_resolve_course_name_fuzzy() {
        let store = test_store();
        store.add_course_metadata(&ml_course()).await.unwrap();
        store
            .add_course_metadata(&Course {
                title: "Advanced Databases".into(),
                course_link: None,
                instructor: None,
                lessons: vec![],
            })
            .await
            .unwrap();

        let resolved = store.resolve_course_name("Intro").await.unwrap();
        assert_eq!(resolved.as_deref(), Some("Introduction to Machine Learning"));
    }

    #[tokio::test]
    async fn test_resolve_empty_catalog_returns_none() {
        let store = test_store();
        assert!(store.resolve_course_name("anything").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_returns_ranked_results() {
        let store = test_store();
        store.add_course_metadata(&ml_course()).await.unwrap();
        store.add_course_content(&ml_chunks()).await.unwrap();

        let results = store
            .search("machine learning artificial intelligence", None, None)
            .await
            .unwrap();
        assert!(!results.is_empty());
        assert!(results.error.is_none());
        assert!(results.documents[0].contains("Machine learning is a subset"));
        // Scores descend.
        for pair in results.scores.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[tokio::test]
    async fn test_search_with_lesson_filter() {
        let store = test_store();
        store.add_course_metadata(&ml_course()).await.unwrap();
        store.add_course_content(&ml_chunks()).await.unwrap();

        let results = store
            .search("learning", None, Some(1))
            .await
            .unwrap();
        assert_eq!(results.documents.len(), 1);
        assert_eq!(results.metadata[0].lesson_number, Some(1));
    }

    #[tokio::test]
    async fn test_search_with_course_filter_resolves_name() {
        let store = test_store();
        store.add_course_metadata(&ml_course()).await.unwrap();
        store.add_course_content(&ml_chunks()).await.unwrap();

        let results = store
            .search("supervised", Some("Machine Learning"), None)
            .await
            .unwrap();
        assert!(results.error.is_none());
        assert!(!results.is_empty());
        for m in &results.metadata {
            assert_eq!(m.course_title, "Introduction to Machine Learning");
        }
    }

    #[tokio::test]
    async fn test_search_unresolvable_course_reports_error() {
        let store = test_store();
        store.add_course_metadata(&ml_course()).await.unwrap();

        let results = store
            .search("anything", Some("Quantum Basket Weaving"), None)
            .await
            .unwrap();
        assert!(results.is_empty());
        assert!(
            results
                .error
                .as_deref()
                .unwrap()
                .contains("No course found matching 'Quantum Basket Weaving'")
        );
    }

    #[tokio::test]
    async fn test_search_empty_store_is_empty_not_error() {
        let store = test_store();
        let results = store.search("anything", None, None).await.unwrap();
        assert!(results.is_empty());
        assert!(results.error.is_none());
    }

    #[tokio::test]
    async fn test_search_caps_results() {
        let config = StoreConfig {
            max_results: 2,
            ..StoreConfig::default()
        };
        let store = VectorStore::in_memory(Box::new(HashEmbedder::new(384)), &config).unwrap();
        store.add_course_metadata(&ml_course()).await.unwrap();
        let chunks: Vec<CourseChunk> = (0..6)
            .map(|i| CourseChunk {
                content: format!("learning notes part {i} about learning"),
                course_title: "Introduction to Machine Learning".into(),
                lesson_number: Some(0),
                chunk_index: i,
            })
            .collect();
        store.add_course_content(&chunks).await.unwrap();

        let results = store.search("learning", None, None).await.unwrap();
        assert_eq!(results.documents.len(), 2);
    }

    #[tokio::test]
    async fn test_get_course_outline_and_lesson_link() {
        let store = test_store();
        store.add_course_metadata(&ml_course()).await.unwrap();

        let outline = store
            .get_course_outline("Introduction to Machine Learning")
            .unwrap()
            .unwrap();
        assert_eq!(outline.lessons.len(), 2);
        assert_eq!(outline.lessons[1].title, "Supervised Learning");

        assert_eq!(
            store.get_lesson_link("Introduction to Machine Learning", 0),
            Some("https://example.com/ml/lesson-0".into())
        );
        assert!(store.get_lesson_link("Introduction to Machine Learning", 1).is_none());
    }

    #[tokio::test]
    async fn test_clear_all() {
        let store = test_store();
        store.add_course_metadata(&ml_course()).await.unwrap();
        store.add_course_content(&ml_chunks()).await.unwrap();
        store.clear_all().unwrap();
        assert_eq!(store.course_count(), 0);
        let results = store.search("machine", None, None).await.unwrap();
        assert!(results.is_empty());
    }
}
