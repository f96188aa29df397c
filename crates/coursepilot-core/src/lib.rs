//! # CoursePilot Core
//!
//! Shared foundation for the CoursePilot workspace: configuration,
//! the error type, domain types (courses, lessons, chunks, search
//! results), and the traits that seam the system together
//! (`Provider`, `Tool`, `Embedder`).

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::CoursePilotConfig;
pub use error::{CoursePilotError, Result};
