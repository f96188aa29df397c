//! # CoursePilot Ingest
//!
//! Turns raw course text files into a structured [`Course`] plus its
//! ordered content chunks, ready for the vector store.
//!
//! ## How it works
//! ```text
//! course1.txt
//!   ↓ parse header (Course Title / Link / Instructor)
//!   ↓ split lesson blocks (Lesson N: ... markers)
//!   ↓ sentence-aware overlapping windows per lesson
//! (Course, Vec<CourseChunk>)
//! ```
//!
//! The parser is deliberately lenient: missing metadata falls back to
//! defaults (filename as title) instead of failing, and a document with
//! no lesson markers still yields one unnumbered run of chunks.
//!
//! [`Course`]: coursepilot_core::types::Course

pub mod chunker;
pub mod parser;

pub use parser::DocumentProcessor;
