//! Tools the model can call during generation.
//!
//! Two retrieval tools over the vector store, plus a manager that
//! owns the registry and dispatches calls by name:
//!
//! - `search_course_content` — semantic search with optional course
//!   and lesson filters
//! - `get_course_outline` — title, link, and lesson list for a course

pub mod manager;
pub mod outline_tool;
pub mod search_tool;

pub use manager::ToolManager;
pub use outline_tool::OutlineTool;
pub use search_tool::SearchTool;
