//! # CoursePilot Store
//!
//! Embedded vector store over SQLite with two logical collections:
//!
//! - **course_catalog** — one record per course, embedded by title, used
//!   for fuzzy course-name resolution ("Intro" → "Introduction to
//!   Machine Learning").
//! - **course_content** — one record per chunk, cosine-ranked semantic
//!   search with optional course/lesson metadata filters.
//!
//! Embeddings come from an [`Embedder`] backend: a deterministic local
//! feature-hashing embedder (zero setup, used by default and in tests)
//! or any OpenAI-compatible `/embeddings` endpoint.
//!
//! [`Embedder`]: coursepilot_core::traits::Embedder

pub mod embedder;
pub mod vector;

pub use embedder::{HashEmbedder, OpenAiEmbedder, create_embedder};
pub use vector::VectorStore;
